//! # Directorio de Usuarios
//! src/auth/directory.rs
//!
//! Directorio de usuarios en memoria: el único estado mutable compartido
//! del servidor. Vive lo que vive el proceso (sin persistencia) y se
//! comparte entre los threads de conexión detrás de un `Mutex`, de modo
//! que dos registros simultáneos del mismo login no puedan tener éxito
//! ambos: lookup e insert ocurren dentro de la misma sección crítica.
//!
//! Los passwords no se guardan en claro: se almacena su digest SHA-256 en
//! hexadecimal y el sign-in compara digest contra digest.

use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Registro de un usuario
///
/// El login es único dentro del directorio. El registro se crea en un
/// registro exitoso y nunca se muta después (no hay cambio de password ni
/// borrado).
#[derive(Debug, Clone)]
pub struct UserRecord {
    /// Login del usuario (sensible a mayúsculas)
    pub login: String,

    /// Digest SHA-256 del password, en hexadecimal
    pub password_digest: String,
}

/// Resultado de un intento de registro
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterOutcome {
    /// El usuario fue registrado
    Registered,

    /// Ya existía un usuario con ese login (sin mutación)
    AlreadyRegistered,
}

/// Resultado de un intento de inicio de sesión
///
/// `Rejected` cubre tanto "no existe el usuario" como "password
/// incorrecto": el protocolo no distingue entre ambos para no filtrar qué
/// logins existen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignInOutcome {
    /// Login existente y password correcto
    LoggedIn,

    /// Login inexistente o password incorrecto
    Rejected,
}

/// Directorio de usuarios thread-safe
#[derive(Clone)]
pub struct UserDirectory {
    inner: Arc<Mutex<HashMap<String, UserRecord>>>,
}

impl UserDirectory {
    /// Crea un directorio vacío
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Registra un usuario nuevo
    ///
    /// Si el login ya existe no se modifica nada (el password almacenado
    /// queda intacto). Lookup e insert ocurren bajo el mismo lock.
    ///
    /// # Ejemplo
    /// ```
    /// use dual_server::auth::{RegisterOutcome, UserDirectory};
    ///
    /// let directory = UserDirectory::new();
    /// assert_eq!(directory.register("marina", "12345"), RegisterOutcome::Registered);
    /// assert_eq!(directory.register("marina", "otro"), RegisterOutcome::AlreadyRegistered);
    /// ```
    pub fn register(&self, login: &str, password: &str) -> RegisterOutcome {
        let mut users = self.inner.lock().unwrap();

        if users.contains_key(login) {
            return RegisterOutcome::AlreadyRegistered;
        }

        users.insert(
            login.to_string(),
            UserRecord {
                login: login.to_string(),
                password_digest: Self::digest(password),
            },
        );

        RegisterOutcome::Registered
    }

    /// Verifica las credenciales de un usuario
    ///
    /// # Ejemplo
    /// ```
    /// use dual_server::auth::{SignInOutcome, UserDirectory};
    ///
    /// let directory = UserDirectory::new();
    /// directory.register("marina", "12345");
    ///
    /// assert_eq!(directory.sign_in("marina", "12345"), SignInOutcome::LoggedIn);
    /// assert_eq!(directory.sign_in("marina", "equivocado"), SignInOutcome::Rejected);
    /// assert_eq!(directory.sign_in("kirill1", "54321"), SignInOutcome::Rejected);
    /// ```
    pub fn sign_in(&self, login: &str, password: &str) -> SignInOutcome {
        let users = self.inner.lock().unwrap();

        match users.get(login) {
            Some(record) if record.password_digest == Self::digest(password) => {
                SignInOutcome::LoggedIn
            }
            _ => SignInOutcome::Rejected,
        }
    }

    /// Cantidad de usuarios registrados
    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().len()
    }

    /// Verifica si el directorio está vacío
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Digest SHA-256 de un password, en hexadecimal
    fn digest(password: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(password.as_bytes());
        format!("{:x}", hasher.finalize())
    }
}

impl Default for UserDirectory {
    fn default() -> Self {
        Self::new()
    }
}
