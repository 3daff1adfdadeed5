use super::{
    ExifTool, ExtractionAdapter, ExtractionOptions, ExtractionOutcome, ExtractionRequest,
    FailureKind, MetadataExtractor, Payload,
};
use crate::errors::AdapterError;
use crate::metadata::export::render;
use crate::selection::SelectedFile;
use async_trait::async_trait;
use serde_json::json;
use std::path::Path;
use std::sync::{Arc, Mutex};

struct CannedExtractor {
    response: Result<String, String>,
    seen_flags: Mutex<Vec<Vec<String>>>,
}

impl CannedExtractor {
    fn ok(raw: &str) -> Self {
        Self {
            response: Ok(raw.to_string()),
            seen_flags: Mutex::new(Vec::new()),
        }
    }

    fn failing(message: &str) -> Self {
        Self {
            response: Err(message.to_string()),
            seen_flags: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl MetadataExtractor for CannedExtractor {
    async fn run(&self, _path: &Path, flags: &[String]) -> Result<String, AdapterError> {
        self.seen_flags
            .lock()
            .expect("mutex envenenado")
            .push(flags.to_vec());
        self.response.clone().map_err(AdapterError::Tool)
    }
}

struct PendingExtractor;

#[async_trait]
impl MetadataExtractor for PendingExtractor {
    async fn run(&self, _path: &Path, _flags: &[String]) -> Result<String, AdapterError> {
        std::future::pending::<()>().await;
        Ok(String::new())
    }
}

fn request(options: ExtractionOptions) -> ExtractionRequest {
    ExtractionRequest::new(SelectedFile::new("/tmp/foto.jpg", 2048), options)
}

#[tokio::test]
async fn structured_extraction_renders_pretty_json() {
    let extractor = Arc::new(CannedExtractor::ok(r#"[{"Tag":"Make","Value":"Acme"}]"#));
    let adapter = ExtractionAdapter::new(extractor.clone());

    let outcome = adapter
        .extract(&request(ExtractionOptions::new(true, false)))
        .await;

    assert_eq!(
        outcome,
        ExtractionOutcome::success(Payload::Structured(json!([
            {"Tag": "Make", "Value": "Acme"}
        ])))
    );
    assert_eq!(
        render(&outcome).as_deref(),
        Some("[\n  {\n    \"Tag\": \"Make\",\n    \"Value\": \"Acme\"\n  }\n]")
    );
    assert_eq!(
        extractor.seen_flags.lock().expect("mutex envenenado").as_slice(),
        &[vec!["-json".to_string()]]
    );
}

#[tokio::test]
async fn adapter_errors_surface_verbatim() {
    let adapter = ExtractionAdapter::new(Arc::new(CannedExtractor::failing("file not found")));

    let outcome = adapter
        .extract(&request(ExtractionOptions::new(true, true)))
        .await;

    assert_eq!(
        outcome,
        ExtractionOutcome::Failure {
            message: "file not found".to_string(),
            kind: FailureKind::Adapter,
        }
    );
    assert_eq!(render(&outcome), None);
}

#[tokio::test]
async fn garbled_structured_output_is_not_salvaged() {
    let adapter = ExtractionAdapter::new(Arc::new(CannedExtractor::ok(r#"[{"Make":"Ac"#)));

    let outcome = adapter
        .extract(&request(ExtractionOptions::new(true, false)))
        .await;

    assert!(matches!(
        outcome,
        ExtractionOutcome::Failure {
            kind: FailureKind::Transform,
            ..
        }
    ));
}

#[tokio::test]
async fn spawned_task_resolves_to_outcome() {
    let adapter = ExtractionAdapter::new(Arc::new(CannedExtractor::ok("Make : Acme\n")));

    let task = adapter.spawn(request(ExtractionOptions::new(false, false)));
    let outcome = task.outcome().await;

    assert_eq!(
        outcome,
        ExtractionOutcome::success(Payload::Text("Make : Acme\n".to_string()))
    );
}

#[tokio::test]
async fn cancelled_task_yields_adapter_failure() {
    let adapter = ExtractionAdapter::new(Arc::new(PendingExtractor));

    let task = adapter.spawn(request(ExtractionOptions::default()));
    task.cancel();
    let outcome = task.outcome().await;

    assert_eq!(
        outcome,
        ExtractionOutcome::Failure {
            message: "Extracción cancelada".to_string(),
            kind: FailureKind::Adapter,
        }
    );
}

#[tokio::test]
async fn missing_binary_is_reported_as_failure() {
    let adapter = ExtractionAdapter::exiftool("/no/existe/exiftool");

    let outcome = adapter.extract(&request(ExtractionOptions::default())).await;

    match outcome {
        ExtractionOutcome::Failure { message, kind } => {
            assert_eq!(kind, FailureKind::Adapter);
            assert!(message.starts_with("No se pudo ejecutar `/no/existe/exiftool`"));
        }
        other => panic!("se esperaba un fallo, se obtuvo {other:?}"),
    }
}

#[cfg(unix)]
mod process {
    use super::*;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use std::path::PathBuf;
    use tempfile::tempdir;

    fn write_script(dir: &Path, body: &str) -> std::io::Result<PathBuf> {
        let path = dir.join("fake-exiftool");
        fs::write(&path, format!("#!/bin/sh\n{body}\n"))?;
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755))?;
        Ok(path)
    }

    #[tokio::test]
    async fn flags_precede_the_file_path() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let script = write_script(dir.path(), r#"printf '%s|%s' "$1" "$(basename "$2")""#)?;
        let exiftool = ExifTool::new(&script);

        let raw = exiftool
            .run(Path::new("/tmp/foto.jpg"), &["-n".to_string()])
            .await?;

        assert_eq!(raw, "-n|foto.jpg");
        Ok(())
    }

    #[tokio::test]
    async fn tool_stderr_becomes_failure_message() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let script = write_script(dir.path(), "echo 'Error: File not found - foto.jpg' >&2\nexit 1")?;
        let adapter = ExtractionAdapter::exiftool(&script);

        let outcome = adapter.extract(&request(ExtractionOptions::default())).await;

        assert_eq!(
            outcome.failure_message(),
            Some("Error: File not found - foto.jpg")
        );
        Ok(())
    }

    #[tokio::test]
    async fn silent_non_zero_exit_is_a_failure() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let script = write_script(dir.path(), "exit 2")?;
        let exiftool = ExifTool::new(&script);

        let result = exiftool.run(Path::new("/tmp/foto.jpg"), &[]).await;

        assert!(matches!(
            result,
            Err(AdapterError::ExitStatus { code: Some(2) })
        ));
        Ok(())
    }

    #[tokio::test]
    async fn structured_process_output_is_parsed() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let script = write_script(
            dir.path(),
            r#"printf '%s' '[{"SourceFile":"foto.jpg","Make":"Acme","ISO":100}]'"#,
        )?;
        let adapter = ExtractionAdapter::exiftool(&script);

        let outcome = adapter
            .extract(&request(ExtractionOptions::new(true, true)))
            .await;

        assert_eq!(
            outcome.payload(),
            Some(&Payload::Structured(json!([
                {"SourceFile": "foto.jpg", "Make": "Acme", "ISO": 100}
            ])))
        );
        Ok(())
    }

    #[tokio::test]
    async fn undecodable_output_is_an_adapter_failure() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let script = write_script(dir.path(), r"printf 'Make : Acm\351\n'")?;
        let adapter = ExtractionAdapter::exiftool(&script);

        let outcome = adapter
            .extract(&request(ExtractionOptions::new(false, false)))
            .await;

        assert_eq!(
            outcome,
            ExtractionOutcome::Failure {
                message: "La salida de la herramienta no es texto UTF-8 válido".to_string(),
                kind: FailureKind::Adapter,
            }
        );
        Ok(())
    }
}
