//! # Dual Server - Entry Point
//! src/main.rs
//!
//! Punto de entrada del servidor TCP de doble protocolo.

use dual_server::config::Config;
use dual_server::server::Server;

fn main() {
    println!("=================================");
    println!("  RedUnix Dual-Protocol Server");
    println!("  Principios de Sistemas Operativos");
    println!("=================================\n");

    // Crear configuración (CLI args o variables de entorno)
    let config = Config::new();

    if let Err(e) = config.validate() {
        eprintln!("💥 Configuración inválida: {}", e);
        std::process::exit(1);
    }

    config.print_summary();

    // Crear el servidor y arrancar el accept loop (bloquea el thread)
    let server = match Server::bind(config) {
        Ok(server) => server,
        Err(e) => {
            eprintln!("💥 Error al iniciar servidor: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = server.run() {
        eprintln!("💥 Error fatal: {}", e);
        std::process::exit(1);
    }
}
