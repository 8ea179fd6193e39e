//! # Dual Server
//! src/lib.rs
//!
//! Servidor TCP de doble protocolo implementado desde cero para demostrar
//! conceptos de sistemas operativos: sockets, concurrencia, sincronización
//! y parsing manual de protocolos.
//!
//! El servidor escucha en un único puerto y clasifica cada conexión por los
//! primeros bytes recibidos:
//! - Si el payload empieza con `GET ` o `POST ` se trata como HTTP/1.0.
//! - Cualquier otro contenido se trata como el protocolo de texto propio
//!   (`command:...; login:...; password:...`) de registro e inicio de sesión.
//!
//! ## Arquitectura
//!
//! El servidor está dividido en módulos especializados:
//! - `protocol`: Clasificación (sniffing) del protocolo entrante
//! - `http`: Parsing y construcción de mensajes HTTP/1.0
//! - `router`: Enrutamiento de peticiones HTTP con precedencia de reglas
//! - `auth`: Protocolo de texto, directorio de usuarios y validación
//! - `files`: Servido de archivos estáticos confinado al www root
//! - `server`: Lógica del servidor TCP y manejo de conexiones
//!
//! ## Ejemplo de uso
//!
//! ```ignore
//! use dual_server::server::Server;
//! use dual_server::config::Config;
//!
//! let config = Config::new();
//! let server = Server::bind(config).expect("Error al iniciar servidor");
//! server.run().expect("Error fatal del servidor");
//! ```

pub mod auth;
pub mod config;
pub mod files;
pub mod http;
pub mod protocol;
pub mod router;
pub mod server;
