//! # Handler del Protocolo de Texto
//! src/auth/handler.rs
//!
//! Ejecuta un payload completo del protocolo de texto contra el directorio
//! de usuarios y produce la respuesta: siempre una sola línea de texto
//! legible, incluso para entradas malformadas. La conexión nunca se cierra
//! en silencio por un error del cliente.

use super::command::ParsedCommand;
use super::directory::{RegisterOutcome, SignInOutcome, UserDirectory};
use regex::Regex;
use std::time::{SystemTime, UNIX_EPOCH};

// Respuestas del protocolo, una línea cada una
const REPLY_REGISTERED: &str = "The user is registered!";
const REPLY_ALREADY_REGISTERED: &str = "The user is already registered...";
const REPLY_LOGGED_IN: &str = "The user is logged in!";
const REPLY_REJECTED: &str = "There's no such user or password is incorrect...";
const REPLY_UNKNOWN_COMMAND: &str = "Unknown command.";

/// Ejecuta un payload del protocolo de texto y retorna la respuesta
///
/// Con `strict` activado, el registro exige además un login de al menos 6
/// caracteres alfanuméricos y un password de al menos 8 caracteres con al
/// menos un dígito; una credencial inválida produce un mensaje de error de
/// validación, distinto del error de gramática.
///
/// # Ejemplo
/// ```
/// use dual_server::auth::{handle_payload, UserDirectory};
///
/// let directory = UserDirectory::new();
///
/// let reply = handle_payload(b"command:reg; login:marina; password:12345", &directory, false);
/// assert_eq!(reply, "The user is registered!");
///
/// let reply = handle_payload(b"command:signin; login:marina; password:12345", &directory, false);
/// assert_eq!(reply, "The user is logged in!");
/// ```
pub fn handle_payload(payload: &[u8], directory: &UserDirectory, strict: bool) -> String {
    let command = match ParsedCommand::parse(payload) {
        Ok(command) => command,
        Err(e) => return format!("Error: {}", e),
    };

    match command {
        ParsedCommand::Register { login, password } => {
            if strict && !valid_credentials(&login, &password) {
                return format!(
                    "{} - registration error for {} - invalid login/password",
                    unix_timestamp(),
                    login
                );
            }

            match directory.register(&login, &password) {
                RegisterOutcome::Registered => REPLY_REGISTERED.to_string(),
                RegisterOutcome::AlreadyRegistered => REPLY_ALREADY_REGISTERED.to_string(),
            }
        }
        ParsedCommand::SignIn { login, password } => {
            match directory.sign_in(&login, &password) {
                SignInOutcome::LoggedIn => REPLY_LOGGED_IN.to_string(),
                SignInOutcome::Rejected => REPLY_REJECTED.to_string(),
            }
        }
        ParsedCommand::Unknown { command: _ } => REPLY_UNKNOWN_COMMAND.to_string(),
    }
}

/// Valida las reglas estrictas de credenciales
///
/// - login: solo caracteres latinos y dígitos, mínimo 6
/// - password: mínimo 8 caracteres, al menos 1 dígito
fn valid_credentials(login: &str, password: &str) -> bool {
    let login_re = Regex::new(r"^[a-zA-Z0-9]{6,}$").unwrap();
    let digit_re = Regex::new(r"\d").unwrap();

    login_re.is_match(login) && password.len() >= 8 && digit_re.is_match(password)
}

/// Timestamp actual en segundos desde el epoch
fn unix_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
