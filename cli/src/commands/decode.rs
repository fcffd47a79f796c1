use fleetrun_core::api::{decode_task, CliError, TaskDescriptor, TaskRecord};

use super::cli::DecodeArgs;

pub fn decode_file(args: &DecodeArgs) -> Result<TaskDescriptor, CliError> {
    let raw = std::fs::read_to_string(&args.file)?;
    let value: serde_json::Value = serde_json::from_str(&raw)
        .map_err(|e| CliError::Anyhow(anyhow::anyhow!("{}: {e}", args.file.display())))?;
    let record = TaskRecord::from_value(&value).map_err(|e| CliError::Anyhow(e.into()))?;
    decode_task(&record).map_err(|e| CliError::Anyhow(e.into()))
}

pub fn decode(args: &DecodeArgs) -> Result<i32, CliError> {
    let descriptor = decode_file(args)?;
    let out = serde_json::to_string_pretty(&descriptor).map_err(|e| CliError::Anyhow(e.into()))?;
    println!("{out}");
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_record_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("task.json");
        // taskInput = {"template":"e30=","inventory":"aG9zdC1h","trigger":"patch"}
        std::fs::write(
            &file,
            r#"{"taskId":"t1","taskSubType":"LINUX_PATCH","taskInput":"eyJ0ZW1wbGF0ZSI6ImUzMD0iLCJpbnZlbnRvcnkiOiJhRzl6ZEMxaCIsInRyaWdnZXIiOiJwYXRjaCJ9"}"#,
        )
        .unwrap();

        let desc = decode_file(&DecodeArgs { file }).unwrap();
        assert_eq!(desc.task_id, "t1");
        assert_eq!(desc.inventory, "host-a");
        assert_eq!(desc.template, "{}");
        assert_eq!(desc.trigger, "patch");
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = decode_file(&DecodeArgs {
            file: "/nonexistent/task.json".into(),
        })
        .unwrap_err();
        assert!(matches!(err, CliError::Io(_)));
    }
}
