//! # Archivos Estáticos
//! src/files/mod.rs
//!
//! Resolución de rutas URL a archivos dentro del www root del servidor.
//! La entrada viene de clientes no confiables, así que la resolución está
//! confinada: rutas absolutas, componentes `..` y symlinks se rechazan, y
//! el path canónico resultante debe seguir debajo del root canónico.
//!
//! La lectura es binaria: el contenido se devuelve byte a byte, sin pasar
//! por String, para no corromper archivos que no sean texto.

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

/// Errores del resolver de archivos
///
/// `NotFound` (el archivo no existe o no es un archivo regular) se
/// distingue de `Io` (fallo de permisos o de lectura): el primero termina
/// en un 404 y el segundo en un 500.
#[derive(Debug)]
pub enum FileError {
    /// El archivo no existe, no es un archivo regular, o la ruta escapa
    /// del root
    NotFound,

    /// Fallo de I/O distinto de la ausencia (permisos, lectura)
    Io(io::Error),
}

impl std::fmt::Display for FileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileError::NotFound => write!(f, "file not found"),
            FileError::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for FileError {}

impl From<io::Error> for FileError {
    fn from(e: io::Error) -> Self {
        if e.kind() == io::ErrorKind::NotFound {
            FileError::NotFound
        } else {
            FileError::Io(e)
        }
    }
}

/// Resolver de archivos estáticos confinado a un directorio root
#[derive(Debug, Clone)]
pub struct StaticFileResolver {
    root: PathBuf,
}

impl StaticFileResolver {
    /// Crea un resolver sobre el directorio root dado
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resuelve un path de URL a un archivo dentro del root y lo lee
    ///
    /// # Argumentos
    ///
    /// * `url_path` - Path tal como llegó en la request line (ej:
    ///   "/docs/manual.pdf")
    ///
    /// # Retorna
    ///
    /// * `Ok(bytes)` - Contenido completo del archivo
    /// * `Err(FileError::NotFound)` - No existe, no es un archivo regular,
    ///   es un symlink, o la ruta intenta escapar del root
    /// * `Err(FileError::Io)` - Fallo de permisos o de lectura
    pub fn resolve(&self, url_path: &str) -> Result<Vec<u8>, FileError> {
        let relative = url_path.trim_start_matches('/');
        if relative.is_empty() {
            return Err(FileError::NotFound);
        }

        // Rechazar componentes que salgan del root ("..", rutas absolutas)
        if !Self::is_confined(Path::new(relative)) {
            return Err(FileError::NotFound);
        }

        let candidate = self.root.join(relative);

        // symlink_metadata no sigue symlinks: un symlink se rechaza
        // directamente en vez de seguirlo
        let metadata = fs::symlink_metadata(&candidate)?;
        if metadata.file_type().is_symlink() || !metadata.is_file() {
            return Err(FileError::NotFound);
        }

        // Defensa final: el path canónico debe quedar debajo del root
        // canónico, aunque algún componente intermedio sea un symlink
        let canonical_root = fs::canonicalize(&self.root)?;
        let canonical = fs::canonicalize(&candidate)?;
        if !canonical.starts_with(&canonical_root) {
            return Err(FileError::NotFound);
        }

        Ok(fs::read(&canonical)?)
    }

    /// Lee un documento designado del root (index, página de 404)
    ///
    /// El nombre viene de la configuración del operador, no del cliente,
    /// así que solo se exige que sea un nombre plano dentro del root.
    pub fn read_document(&self, name: &str) -> Result<String, FileError> {
        let path = self.root.join(name);

        let metadata = fs::symlink_metadata(&path)?;
        if !metadata.is_file() {
            return Err(FileError::NotFound);
        }

        Ok(fs::read_to_string(&path)?)
    }

    /// Verifica que un path relativo no tenga componentes que escapen
    fn is_confined(path: &Path) -> bool {
        path.components().all(|component| {
            matches!(component, Component::Normal(_) | Component::CurDir)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use std::sync::atomic::{AtomicUsize, Ordering};

    static DIR_COUNTER: AtomicUsize = AtomicUsize::new(0);

    /// Crea un directorio root temporal único para el test
    fn temp_root() -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "dual_server_files_test_{}_{}",
            std::process::id(),
            DIR_COUNTER.fetch_add(1, Ordering::SeqCst)
        ));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_resolve_existing_file() {
        let root = temp_root();
        fs::write(root.join("hello.txt"), b"hello world").unwrap();

        let resolver = StaticFileResolver::new(&root);
        let content = resolver.resolve("/hello.txt").unwrap();

        assert_eq!(content, b"hello world");
    }

    #[test]
    fn test_resolve_nested_file() {
        let root = temp_root();
        fs::create_dir_all(root.join("docs")).unwrap();
        fs::write(root.join("docs/manual.txt"), b"manual").unwrap();

        let resolver = StaticFileResolver::new(&root);
        let content = resolver.resolve("/docs/manual.txt").unwrap();

        assert_eq!(content, b"manual");
    }

    #[test]
    fn test_resolve_binary_content() {
        let root = temp_root();
        let data = vec![0x00u8, 0xFF, 0x7F, 0x80, 0x0A, 0x0D];
        fs::write(root.join("data.bin"), &data).unwrap();

        let resolver = StaticFileResolver::new(&root);
        let content = resolver.resolve("/data.bin").unwrap();

        assert_eq!(content, data);
    }

    #[test]
    fn test_resolve_missing_file_is_not_found() {
        let root = temp_root();
        let resolver = StaticFileResolver::new(&root);

        assert!(matches!(resolver.resolve("/missing.txt"), Err(FileError::NotFound)));
    }

    #[test]
    fn test_resolve_directory_is_not_found() {
        let root = temp_root();
        fs::create_dir_all(root.join("subdir")).unwrap();

        let resolver = StaticFileResolver::new(&root);

        assert!(matches!(resolver.resolve("/subdir"), Err(FileError::NotFound)));
    }

    #[test]
    fn test_traversal_is_rejected() {
        let root = temp_root();
        // Un archivo "secreto" fuera del root
        let outside = root.parent().unwrap().join(format!(
            "dual_server_secret_{}.txt",
            std::process::id()
        ));
        fs::write(&outside, b"top secret").unwrap();

        let resolver = StaticFileResolver::new(&root);
        let escaped = format!(
            "/../{}",
            outside.file_name().unwrap().to_string_lossy()
        );

        assert!(matches!(resolver.resolve(&escaped), Err(FileError::NotFound)));

        fs::remove_file(&outside).ok();
    }

    #[test]
    fn test_inner_dotdot_is_rejected() {
        let root = temp_root();
        fs::write(root.join("ok.txt"), b"ok").unwrap();

        let resolver = StaticFileResolver::new(&root);

        // Aunque "docs/../ok.txt" resolvería dentro del root, cualquier
        // componente ".." se rechaza
        assert!(matches!(
            resolver.resolve("/docs/../ok.txt"),
            Err(FileError::NotFound)
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_is_rejected() {
        let root = temp_root();
        let outside = root.parent().unwrap().join(format!(
            "dual_server_symlink_target_{}.txt",
            std::process::id()
        ));
        fs::write(&outside, b"outside content").unwrap();
        std::os::unix::fs::symlink(&outside, root.join("link.txt")).unwrap();

        let resolver = StaticFileResolver::new(&root);

        assert!(matches!(resolver.resolve("/link.txt"), Err(FileError::NotFound)));

        fs::remove_file(&outside).ok();
    }

    #[test]
    fn test_read_document() {
        let root = temp_root();
        let mut file = File::create(root.join("index.html")).unwrap();
        file.write_all(b"<h1>Home</h1>").unwrap();

        let resolver = StaticFileResolver::new(&root);

        assert_eq!(resolver.read_document("index.html").unwrap(), "<h1>Home</h1>");
    }

    #[test]
    fn test_read_missing_document_is_not_found() {
        let root = temp_root();
        let resolver = StaticFileResolver::new(&root);

        assert!(matches!(
            resolver.read_document("index.html"),
            Err(FileError::NotFound)
        ));
    }
}
