//! # Sistema de Routing HTTP
//! src/router/mod.rs
//!
//! Este módulo enruta las peticiones HTTP a su respuesta. A diferencia de
//! una tabla de rutas exactas, aquí las reglas se evalúan en orden y gana
//! la primera que coincida:
//!
//! 1. `/` → documento index del www root
//! 2. `/test/<n>/` → eco "test número n lanzado"
//! 3. `/message/<login>/<text>/` → eco del mensaje con timestamp (y log)
//! 4. Cualquier archivo existente bajo el www root → contenido binario
//! 5. Fallback → 404 con el documento de "no encontrado"
//!
//! La precedencia importa: `/test/abc/` es un error de parseo (400), nunca
//! una búsqueda de archivo llamada `test/abc`.

use crate::config::Config;
use crate::files::{FileError, StaticFileResolver};
use crate::http::{Request, Response, StatusCode};
use std::time::{SystemTime, UNIX_EPOCH};

/// Resultado de aplicar las reglas de enrutamiento a un path
///
/// Se deriva determinísticamente del path; es efímero, uno por request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteMatch {
    /// Path "/" → documento index
    Root,

    /// Path "/test/<n>/" → eco del número de test
    TestEcho(i64),

    /// Path "/message/<login>/<text>/" → eco del mensaje
    MessageEcho { login: String, text: String },

    /// Cualquier otro path: candidato a archivo estático (path relativo)
    StaticFile(String),

    /// Path que no puede nombrar un archivo (ej: "//")
    NotFound,
}

/// Errores de enrutamiento causados por la entrada del cliente
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteError {
    /// El segmento después de /test/ no es un entero
    InvalidTestNumber(String),

    /// Faltan segmentos después de /message/
    IncompleteMessagePath,
}

impl std::fmt::Display for RouteError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RouteError::InvalidTestNumber(segment) => {
                write!(f, "Test number '{}' is not a valid integer", segment)
            }
            RouteError::IncompleteMessagePath => {
                write!(f, "Message path must be /message/<login>/<text>/")
            }
        }
    }
}

impl std::error::Error for RouteError {}

impl RouteMatch {
    /// Aplica las reglas de enrutamiento en orden a un path
    ///
    /// Función pura: no toca el filesystem. Decidir si el candidato a
    /// archivo estático existe es trabajo del dispatch.
    ///
    /// # Ejemplo
    /// ```
    /// use dual_server::router::RouteMatch;
    ///
    /// assert_eq!(RouteMatch::resolve("/").unwrap(), RouteMatch::Root);
    /// assert_eq!(RouteMatch::resolve("/test/7/").unwrap(), RouteMatch::TestEcho(7));
    /// assert!(RouteMatch::resolve("/test/abc/").is_err());
    /// ```
    pub fn resolve(path: &str) -> Result<Self, RouteError> {
        if path == "/" {
            return Ok(RouteMatch::Root);
        }

        if path.starts_with("/test/") {
            // "/test/7/" → ["", "test", "7", ""]
            let segment = path.split('/').nth(2).unwrap_or("");
            return match segment.parse::<i64>() {
                Ok(n) => Ok(RouteMatch::TestEcho(n)),
                Err(_) => Err(RouteError::InvalidTestNumber(segment.to_string())),
            };
        }

        if path.starts_with("/message/") {
            // "/message/bob/hello/" → ["", "message", "bob", "hello", ""]
            let parts: Vec<&str> = path.split('/').collect();
            let login = parts.get(2).copied().unwrap_or("");
            let text = parts.get(3).copied().unwrap_or("");

            if login.is_empty() || text.is_empty() {
                return Err(RouteError::IncompleteMessagePath);
            }

            return Ok(RouteMatch::MessageEcho {
                login: login.to_string(),
                text: text.to_string(),
            });
        }

        let relative = path.trim_start_matches('/');
        if relative.is_empty() {
            return Ok(RouteMatch::NotFound);
        }

        Ok(RouteMatch::StaticFile(relative.to_string()))
    }
}

/// Router que resuelve peticiones HTTP a respuestas
pub struct Router {
    resolver: StaticFileResolver,
    index_file: String,
    not_found_file: String,
}

impl Router {
    /// Crea el router a partir de la configuración del servidor
    pub fn new(config: &Config) -> Self {
        Self {
            resolver: StaticFileResolver::new(config.www_root.clone()),
            index_file: config.index_file.clone(),
            not_found_file: config.not_found_file.clone(),
        }
    }

    /// Enruta un request parseado y produce la respuesta completa
    ///
    /// Los errores de enrutamiento (número de test inválido, path de
    /// mensaje incompleto) se convierten en 400; los errores del resolver
    /// en 404 o 500. Nunca se propaga un error al caller.
    pub fn route(&self, request: &Request) -> Response {
        let response = match RouteMatch::resolve(request.path()) {
            Ok(RouteMatch::Root) => self.serve_index(),
            Ok(RouteMatch::TestEcho(n)) => {
                Response::html(&format!("<h1>Test number {} launched</h1>", n))
            }
            Ok(RouteMatch::MessageEcho { login, text }) => self.serve_message(&login, &text),
            Ok(RouteMatch::StaticFile(relative)) => self.serve_static(&relative),
            Ok(RouteMatch::NotFound) => self.not_found(),
            Err(e) => Response::error(StatusCode::BadRequest, &e.to_string()),
        };

        self.with_common_headers(response)
    }

    /// Sirve el documento index para la ruta "/"
    ///
    /// Si el documento no existe en disco se degrada a 404 con un mensaje
    /// descriptivo, nunca a un error sin manejar.
    fn serve_index(&self) -> Response {
        match self.resolver.read_document(&self.index_file) {
            Ok(content) => Response::html(&content),
            Err(FileError::NotFound) => Response::error(
                StatusCode::NotFound,
                &format!("Index document not found: {}", self.index_file),
            ),
            Err(FileError::Io(e)) => Response::error(
                StatusCode::InternalServerError,
                &format!("Failed to read index document: {}", e),
            ),
        }
    }

    /// Compone el eco del mensaje, lo emite por consola y lo retorna
    fn serve_message(&self, login: &str, text: &str) -> Response {
        let line = format!(
            "{} - message from user {} - {}",
            unix_timestamp(),
            login,
            text
        );

        println!("{}", line);

        Response::html(&line)
    }

    /// Sirve un archivo estático bajo el www root
    fn serve_static(&self, relative: &str) -> Response {
        match self.resolver.resolve(&format!("/{}", relative)) {
            Ok(bytes) => Response::new(StatusCode::Ok)
                .with_header("Content-Type", "application/octet-stream")
                .with_body_bytes(bytes),
            Err(FileError::NotFound) => self.not_found(),
            Err(FileError::Io(e)) => Response::error(
                StatusCode::InternalServerError,
                &format!("Failed to read file: {}", e),
            ),
        }
    }

    /// Respuesta 404 con el documento configurado, o un cuerpo mínimo
    /// sintetizado si ese documento tampoco existe
    fn not_found(&self) -> Response {
        let body = self
            .resolver
            .read_document(&self.not_found_file)
            .unwrap_or_else(|_| "<h1>404 Not Found</h1>".to_string());

        Response::new(StatusCode::NotFound)
            .with_header("Content-Type", "text/html; charset=utf-8")
            .with_body(&body)
    }

    /// Agrega headers comunes a todas las respuestas
    fn with_common_headers(&self, response: Response) -> Response {
        response
            .with_header("Server", "RedUnix-Dual/0.1")
            .with_header("Connection", "close")
    }
}

/// Timestamp actual en segundos desde el epoch
fn unix_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
