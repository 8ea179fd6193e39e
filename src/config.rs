//! # Configuración del Servidor
//! src/config.rs
//!
//! Este módulo define la configuración del servidor de doble protocolo con
//! soporte completo para argumentos CLI y variables de entorno.
//!
//! ## Ejemplos de uso
//!
//! ### CLI
//! ```bash
//! ./dual_server --port 8000 \
//!   --www-root ./www \
//!   --read-timeout-ms 5000 \
//!   --strict-auth
//! ```
//!
//! ### Variables de entorno
//! ```bash
//! HTTP_PORT=8000 HTTP_HOST=0.0.0.0 ./dual_server
//! ```

use clap::Parser;

/// Configuración del servidor de doble protocolo
#[derive(Debug, Clone, Parser)]
#[command(name = "dual_server")]
#[command(about = "Servidor TCP de doble protocolo (HTTP/1.0 + texto plano) para Principios de Sistemas Operativos")]
#[command(version = "0.1.0")]
pub struct Config {
    /// Puerto en el que escucha el servidor
    #[arg(short, long, default_value = "8000", env = "HTTP_PORT")]
    pub port: u16,

    /// Host/IP en el que escucha
    /// ('0.0.0.0' para aceptar conexiones de cualquier interfaz de la red local)
    #[arg(long, default_value = "0.0.0.0", env = "HTTP_HOST")]
    pub host: String,

    // === Archivos estáticos ===

    /// Directorio raíz desde donde se sirven archivos estáticos
    #[arg(long = "www-root", default_value = "./www", env = "WWW_ROOT")]
    pub www_root: String,

    /// Documento que se sirve para la ruta "/"
    #[arg(long = "index-file", default_value = "index.html", env = "INDEX_FILE")]
    pub index_file: String,

    /// Documento que se sirve como cuerpo de las respuestas 404
    #[arg(long = "not-found-file", default_value = "not_found.html", env = "NOT_FOUND_FILE")]
    pub not_found_file: String,

    // === Conexiones ===

    /// Timeout de lectura por conexión en milisegundos (0 = sin timeout)
    #[arg(long = "read-timeout-ms", default_value = "5000", env = "READ_TIMEOUT_MS")]
    pub read_timeout_ms: u64,

    // === Protocolo de texto ===

    /// Activa la validación estricta de credenciales en el registro:
    /// login de al menos 6 caracteres alfanuméricos y password de al menos
    /// 8 caracteres con al menos 1 dígito
    #[arg(long = "strict-auth", env = "STRICT_AUTH")]
    pub strict_auth: bool,
}

impl Config {
    /// Crea una nueva configuración parseando argumentos CLI
    pub fn new() -> Self {
        Config::parse()
    }

    /// Obtiene la dirección completa para bind (host:port)
    ///
    /// # Ejemplo
    /// ```rust
    /// use dual_server::config::Config;
    /// use clap::Parser;
    ///
    /// let config = Config::parse_from(["dual_server", "--host", "127.0.0.1", "--port", "8000"]);
    /// assert_eq!(config.address(), "127.0.0.1:8000");
    /// ```
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Valida la configuración
    ///
    /// Retorna errores si hay valores inválidos
    pub fn validate(&self) -> Result<(), String> {
        if self.host.trim().is_empty() {
            return Err("Host must not be empty".to_string());
        }

        if self.www_root.trim().is_empty() {
            return Err("WWW root must not be empty".to_string());
        }

        // Los documentos designados se resuelven dentro del www root,
        // no pueden ser rutas con directorios
        if self.index_file.contains('/') || self.index_file.contains('\\') {
            return Err("Index file must be a plain file name".to_string());
        }
        if self.not_found_file.contains('/') || self.not_found_file.contains('\\') {
            return Err("Not-found file must be a plain file name".to_string());
        }

        Ok(())
    }

    /// Imprime un resumen de la configuración
    pub fn print_summary(&self) {
        println!("╔══════════════════════════════════════════════════════════════╗");
        println!("║        RedUnix Dual-Protocol Server Configuration            ║");
        println!("╚══════════════════════════════════════════════════════════════╝");
        println!();
        println!("🌐 Network:");
        println!("   Address:        {}", self.address());
        println!("   Read timeout:   {} ms", self.read_timeout_ms);
        println!();
        println!("📁 Static files:");
        println!("   WWW root:       {}", self.www_root);
        println!("   Index:          {}", self.index_file);
        println!("   Not found:      {}", self.not_found_file);
        println!();
        println!("🔐 Text protocol:");
        println!("   Strict auth:    {}", if self.strict_auth { "on" } else { "off" });
        println!();
    }
}

impl Default for Config {
    /// Configuración por defecto (igual que sin argumentos CLI)
    fn default() -> Self {
        Config::parse_from(["dual_server"])
    }
}
