//! Dependency check for the Python side of the conversion.

use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use onnxport_common::error::ConvertError;
use onnxport_common::toolchain::PackageResolver;
use tokio::process::Command;
use tracing::{debug, warn};

/// Resolves packages by asking the interpreter to import them.
pub struct PythonResolver {
    interpreter: PathBuf,
}

impl PythonResolver {
    pub fn new(interpreter: impl Into<PathBuf>) -> Self {
        Self {
            interpreter: interpreter.into(),
        }
    }
}

#[async_trait]
impl PackageResolver for PythonResolver {
    async fn is_importable(&self, package: &str) -> Result<bool, ConvertError> {
        let status = Command::new(&self.interpreter)
            .arg("-c")
            .arg(format!("import {package}"))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map_err(|source| ConvertError::InterpreterSpawn {
                interpreter: self.interpreter.display().to_string(),
                source,
            })?;

        Ok(status.success())
    }
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct DependencyReport {
    /// Missing package names, in the order they were checked, without repeats.
    pub missing: Vec<String>,
}

impl DependencyReport {
    pub fn is_satisfied(&self) -> bool {
        self.missing.is_empty()
    }
}

/// Resolves every package in order and collects the ones that fail.
///
/// If the resolver cannot run at all, the failing package and everything
/// after it are reported missing without further attempts.
pub async fn check_dependencies(
    resolver: &dyn PackageResolver,
    packages: &[&str],
) -> DependencyReport {
    let mut missing: Vec<String> = Vec::new();
    let mut pending = packages.iter();

    while let Some(&package) = pending.next() {
        match resolver.is_importable(package).await {
            Ok(true) => debug!("package '{package}' resolved"),
            Ok(false) => push_unique(&mut missing, package),
            Err(e) => {
                warn!("{e}");
                push_unique(&mut missing, package);
                for &rest in pending.by_ref() {
                    push_unique(&mut missing, rest);
                }
            }
        }
    }

    DependencyReport { missing }
}

fn push_unique(missing: &mut Vec<String>, package: &str) {
    if !missing.iter().any(|m| m == package) {
        missing.push(package.to_string());
    }
}
