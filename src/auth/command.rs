//! # Parser del Protocolo de Texto
//! src/auth/command.rs
//!
//! Este módulo implementa un parser explícito para la gramática:
//!
//! ```text
//! command:<cmd>; login:<login>; password:<password>
//! ```
//!
//! Separar el payload por `"; "` debe producir exactamente tres segmentos,
//! cada uno con la forma `key:value` y con las claves `command`, `login` y
//! `password` en ese orden. Cualquier desviación produce un error tipado,
//! nunca una excepción sin manejar: el servidor lo convierte en una
//! respuesta `Error: <descripción>` por la misma conexión.

/// Comando tipado extraído de un payload del protocolo de texto
///
/// Se construye por request y se descarta tras producir la respuesta.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedCommand {
    /// `command:reg` - Registrar un usuario nuevo
    Register { login: String, password: String },

    /// `command:signin` - Iniciar sesión de un usuario existente
    SignIn { login: String, password: String },

    /// Gramática válida pero comando no reconocido
    Unknown { command: String },
}

/// Errores de la gramática del protocolo de texto
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandParseError {
    /// El payload no es UTF-8 válido
    InvalidUtf8,

    /// La cantidad de segmentos separados por "; " no es 3
    WrongSegmentCount(usize),

    /// Un segmento no tiene el separador ':'
    MissingSeparator(String),

    /// Un segmento tiene una clave distinta a la esperada
    UnexpectedKey {
        expected: &'static str,
        found: String,
    },
}

impl std::fmt::Display for CommandParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommandParseError::InvalidUtf8 => {
                write!(f, "payload is not valid UTF-8")
            }
            CommandParseError::WrongSegmentCount(n) => {
                write!(f, "expected 3 segments separated by '; ', got {}", n)
            }
            CommandParseError::MissingSeparator(segment) => {
                write!(f, "segment '{}' is missing the ':' separator", segment)
            }
            CommandParseError::UnexpectedKey { expected, found } => {
                write!(f, "expected key '{}', got '{}'", expected, found)
            }
        }
    }
}

impl std::error::Error for CommandParseError {}

impl ParsedCommand {
    /// Parsea un payload del protocolo de texto
    ///
    /// # Ejemplo
    ///
    /// ```
    /// use dual_server::auth::ParsedCommand;
    ///
    /// let parsed = ParsedCommand::parse(b"command:reg; login:marina; password:12345").unwrap();
    /// assert_eq!(
    ///     parsed,
    ///     ParsedCommand::Register {
    ///         login: "marina".to_string(),
    ///         password: "12345".to_string(),
    ///     }
    /// );
    /// ```
    pub fn parse(payload: &[u8]) -> Result<Self, CommandParseError> {
        let text = std::str::from_utf8(payload).map_err(|_| CommandParseError::InvalidUtf8)?;

        let segments: Vec<&str> = text.split("; ").collect();
        if segments.len() != 3 {
            return Err(CommandParseError::WrongSegmentCount(segments.len()));
        }

        let command = Self::segment_value(segments[0], "command")?;
        let login = Self::segment_value(segments[1], "login")?;
        let password = Self::segment_value(segments[2], "password")?;

        match command.as_str() {
            "reg" => Ok(ParsedCommand::Register { login, password }),
            "signin" => Ok(ParsedCommand::SignIn { login, password }),
            _ => Ok(ParsedCommand::Unknown { command }),
        }
    }

    /// Extrae el valor de un segmento `key:value`, exigiendo la clave dada
    ///
    /// El valor puede contener ':' (solo el primero separa); la clave debe
    /// coincidir exactamente, sin espacios extra.
    fn segment_value(segment: &str, expected: &'static str) -> Result<String, CommandParseError> {
        let (key, value) = segment
            .split_once(':')
            .ok_or_else(|| CommandParseError::MissingSeparator(segment.to_string()))?;

        if key != expected {
            return Err(CommandParseError::UnexpectedKey {
                expected,
                found: key.to_string(),
            });
        }

        Ok(value.to_string())
    }
}
