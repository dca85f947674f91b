use thiserror::Error;

/// Load-time failures of the shader stage. Every variant is fatal: the
/// diagnostic is printed to stderr and the process exits with code 1. There
/// is no recoverable category and no retry path.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("couldn't find the source file {path}")]
    FileNotFound {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to compile {label} shader:\n{log}")]
    CompileError { label: &'static str, log: String },

    #[error("failed to link shader program:\n{log}")]
    LinkError { log: String },
}

#[cfg(test)]
mod tests {
    use std::io;

    use super::*;

    #[test]
    fn file_not_found_names_the_file() {
        let err = RenderError::FileNotFound {
            path: "shaders/sphere.vert.wgsl".to_string(),
            source: io::Error::from(io::ErrorKind::NotFound),
        };
        assert!(err.to_string().contains("shaders/sphere.vert.wgsl"));
    }

    #[test]
    fn compile_error_carries_the_backend_log() {
        let err = RenderError::CompileError {
            label: "vertex",
            log: "unknown identifier 'mpv'".to_string(),
        };
        let rendered = err.to_string();
        assert!(rendered.contains("vertex"));
        assert!(rendered.contains("unknown identifier 'mpv'"));
    }

    #[test]
    fn link_error_carries_the_backend_log() {
        let err = RenderError::LinkError {
            log: "location 0 is bound twice".to_string(),
        };
        assert!(err.to_string().contains("location 0 is bound twice"));
    }
}
