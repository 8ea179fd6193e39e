//! # Servidor TCP Concurrente de Doble Protocolo
//! src/server/tcp.rs
//!
//! Implementación del servidor TCP que acepta conexiones de clientes HTTP
//! y de clientes del protocolo de texto en el mismo puerto. Cada conexión
//! se procesa en su propio thread.
//!
//! ## Ciclo de vida de una conexión
//!
//! ```text
//! accept → read (una sola lectura, máx. 1024 bytes) → sniff →
//!     {HTTP handler | handler del protocolo de texto} →
//!     write (una sola respuesta) → close
//! ```
//!
//! No hay keep-alive: se escribe exactamente una respuesta y la conexión
//! se cierra incondicionalmente. Una lectura vacía cierra sin responder.
//! Ningún error de una conexión termina el accept loop.

use crate::auth::{self, UserDirectory};
use crate::config::Config;
use crate::http::{Request, Response, StatusCode};
use crate::protocol::Protocol;
use crate::router::Router;
use std::io::{Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Tamaño del buffer de lectura: una request es una sola lectura de a lo
/// sumo este tamaño, sin soporte para payloads que lo excedan
const READ_BUFFER_SIZE: usize = 1024;

/// Servidor TCP de doble protocolo
pub struct Server {
    config: Config,
    router: Arc<Router>,
    users: UserDirectory,
    listener: TcpListener,
}

impl Server {
    /// Crea el servidor y hace bind a la dirección configurada
    ///
    /// El bind se separa de `run()` para que los tests puedan conocer el
    /// puerto efímero antes de arrancar el accept loop.
    pub fn bind(config: Config) -> std::io::Result<Self> {
        let address = config.address();
        println!("[*] Iniciando servidor en {}", address);

        let listener = TcpListener::bind(&address)?;
        println!("[+] Servidor escuchando en {}", address);

        let router = Arc::new(Router::new(&config));

        Ok(Self {
            config,
            router,
            users: UserDirectory::new(),
            listener,
        })
    }

    /// Dirección local real del listener (útil con puerto 0)
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Ejecuta el accept loop (bloquea el thread actual)
    ///
    /// Cada conexión aceptada se maneja en su propio thread. Los errores
    /// por conexión se registran y se descartan: una conexión mala nunca
    /// tira abajo el listener.
    pub fn run(self) -> std::io::Result<()> {
        println!("[*] Modo concurrente: un thread por conexion\n");

        for stream in self.listener.incoming() {
            match stream {
                Ok(stream) => {
                    let router = Arc::clone(&self.router);
                    let users = self.users.clone();
                    let read_timeout_ms = self.config.read_timeout_ms;
                    let strict_auth = self.config.strict_auth;

                    let peer_addr = stream
                        .peer_addr()
                        .map(|addr| addr.to_string())
                        .unwrap_or_else(|_| "unknown".to_string());

                    println!(" ✅ Nueva conexión desde: {}", peer_addr);

                    thread::spawn(move || {
                        if let Err(e) = Self::handle_connection_static(
                            stream,
                            router,
                            users,
                            read_timeout_ms,
                            strict_auth,
                        ) {
                            eprintln!("   ❌ Error en thread: {}", e);
                        }
                    });
                }
                Err(e) => {
                    eprintln!("   ❌ Error al aceptar conexión: {}", e);
                }
            }
        }

        Ok(())
    }

    /// Maneja una conexión completa: read → sniff → dispatch → write → close
    fn handle_connection_static(
        mut stream: TcpStream,
        router: Arc<Router>,
        users: UserDirectory,
        read_timeout_ms: u64,
        strict_auth: bool,
    ) -> std::io::Result<()> {
        // Timeout de lectura defensivo: un cliente que conecta y nunca
        // escribe no retiene el thread para siempre
        if read_timeout_ms > 0 {
            stream.set_read_timeout(Some(Duration::from_millis(read_timeout_ms)))?;
        }

        let mut buffer = [0u8; READ_BUFFER_SIZE];
        let bytes_read = stream.read(&mut buffer)?;

        if bytes_read == 0 {
            // El cliente no envió nada: cerrar sin responder
            println!("   ✅ Conexión cerrada sin datos");
            return Ok(());
        }

        let payload = &buffer[..bytes_read];
        println!("   ✅ {} bytes recibidos", bytes_read);

        let response_bytes = match Protocol::sniff(payload) {
            Protocol::Http => Self::handle_http(payload, &router),
            Protocol::CustomText => Self::handle_custom_text(payload, &users, strict_auth),
        };

        stream.write_all(&response_bytes)?;
        stream.flush()?;

        Ok(())
    }

    /// Procesa un payload clasificado como HTTP
    fn handle_http(payload: &[u8], router: &Router) -> Vec<u8> {
        let response = match Request::parse(payload) {
            Ok(request) => {
                println!("   ✅ HTTP {} {}", request.method().as_str(), request.path());
                router.route(&request)
            }
            Err(e) => {
                // HTTP malformado: responder 400 por la misma conexión,
                // nunca un panic ni un cierre silencioso
                println!("   ❌ Parse error: {}", e);
                Response::error(StatusCode::BadRequest, &format!("Invalid request: {}", e))
            }
        };

        response.to_bytes()
    }

    /// Procesa un payload clasificado como protocolo de texto
    ///
    /// La respuesta es una sola línea de texto, sin framing HTTP.
    fn handle_custom_text(payload: &[u8], users: &UserDirectory, strict: bool) -> Vec<u8> {
        println!(
            "   ✅ Texto recibido: {}",
            String::from_utf8_lossy(payload)
        );

        let reply = auth::handle_payload(payload, users, strict);
        println!("   ✅ Respuesta: {}", reply);

        reply.into_bytes()
    }
}

#[cfg(test)]
mod more_server_tests {
    use super::*;
    use clap::Parser;
    use std::fs;
    use std::io::{Read, Write};
    use std::net::TcpStream;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};

    static DIR_COUNTER: AtomicUsize = AtomicUsize::new(0);

    fn temp_root() -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "dual_server_tcp_test_{}_{}",
            std::process::id(),
            DIR_COUNTER.fetch_add(1, Ordering::SeqCst)
        ));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn test_config(root: &PathBuf) -> Config {
        Config::parse_from([
            "dual_server",
            "--host",
            "127.0.0.1",
            "--port",
            "0",
            "--www-root",
            root.to_str().unwrap(),
        ])
    }

    /// Envía bytes crudos por una conexión y retorna la respuesta completa
    fn send_raw(addr: SocketAddr, payload: &[u8]) -> Vec<u8> {
        let mut client = TcpStream::connect(addr).unwrap();
        client.write_all(payload).unwrap();
        client.shutdown(std::net::Shutdown::Write).unwrap();

        let mut buf = Vec::new();
        client.read_to_end(&mut buf).unwrap();
        buf
    }

    fn accept_one(server: &Server) {
        let (stream, _) = server.listener.accept().unwrap();
        Server::handle_connection_static(
            stream,
            Arc::clone(&server.router),
            server.users.clone(),
            server.config.read_timeout_ms,
            server.config.strict_auth,
        )
        .unwrap();
    }

    #[test]
    fn test_http_request_gets_http_response() {
        let root = temp_root();
        let server = Server::bind(test_config(&root)).unwrap();
        let addr = server.local_addr().unwrap();

        let t = thread::spawn(move || accept_one(&server));

        let response = send_raw(addr, b"GET /test/7/ HTTP/1.0\r\n\r\n");
        let text = String::from_utf8_lossy(&response);

        assert!(text.starts_with("HTTP/1.0 200 OK"));
        assert!(text.contains("7"));

        t.join().unwrap();
    }

    #[test]
    fn test_custom_payload_gets_plain_text_reply() {
        let root = temp_root();
        let server = Server::bind(test_config(&root)).unwrap();
        let addr = server.local_addr().unwrap();

        let t = thread::spawn(move || accept_one(&server));

        let response = send_raw(addr, b"command:reg; login:marina; password:12345");
        let text = String::from_utf8_lossy(&response);

        // Sin framing HTTP: la respuesta es la línea de texto directamente
        assert!(!text.starts_with("HTTP/"));
        assert!(text.contains("registered"));

        t.join().unwrap();
    }

    #[test]
    fn test_malformed_http_gets_400() {
        let root = temp_root();
        let server = Server::bind(test_config(&root)).unwrap();
        let addr = server.local_addr().unwrap();

        let t = thread::spawn(move || accept_one(&server));

        // Prefijo GET pero request line rota: clasifica HTTP, falla el parser
        let response = send_raw(addr, b"GET onlyonetoken\r\n\r\n");
        let text = String::from_utf8_lossy(&response);

        assert!(text.contains("400 Bad Request"));
        assert!(text.contains("Invalid request"));

        t.join().unwrap();
    }

    #[test]
    fn test_peer_closed_immediately() {
        // Cubre la rama bytes_read == 0
        let root = temp_root();
        let server = Server::bind(test_config(&root)).unwrap();
        let addr = server.local_addr().unwrap();

        let t = thread::spawn(move || accept_one(&server));

        // Cliente que conecta y cierra sin mandar datos
        drop(TcpStream::connect(addr).unwrap());

        t.join().unwrap();
    }

    #[test]
    fn test_binary_garbage_is_custom_text() {
        let root = temp_root();
        let server = Server::bind(test_config(&root)).unwrap();
        let addr = server.local_addr().unwrap();

        let t = thread::spawn(move || accept_one(&server));

        let response = send_raw(addr, &[0x00, 0x01, 0x02, 0x03]);
        let text = String::from_utf8_lossy(&response);

        // Ni HTTP ni gramática válida: error del protocolo de texto
        assert!(text.starts_with("Error:"));

        t.join().unwrap();
    }
}
