use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};
use tokio::process::Command;

use fleetrun_core::api::{AnsibleRunnerConfig, JobDescriptor, JobRunner, RunnerOutput};
use fleetrun_core::runner::parse_event_line;

use crate::http::preview;

/// Runs jobs through the `ansible-runner` CLI in JSON event mode.
pub struct AnsibleRunnerPlugin {
    bin: String,
    private_data_dir: PathBuf,
    timeout: Option<Duration>,
}

impl AnsibleRunnerPlugin {
    pub fn new(cfg: &AnsibleRunnerConfig) -> Self {
        Self {
            bin: cfg.bin.clone(),
            private_data_dir: PathBuf::from(&cfg.private_data_dir),
            timeout: cfg.timeout_ms.map(Duration::from_millis),
        }
    }

    fn data_dir(&self) -> Result<PathBuf> {
        if self.private_data_dir.is_absolute() {
            return Ok(self.private_data_dir.clone());
        }
        Ok(std::env::current_dir()?.join(&self.private_data_dir))
    }

    fn command(&self, data_dir: &Path, job: &JobDescriptor, ident: &str) -> Command {
        let mut cmd = Command::new(&self.bin);
        cmd.arg("run")
            .arg(data_dir)
            .arg("-p")
            .arg(&job.playbook)
            .arg("--inventory")
            .arg(&job.inventory)
            .arg("--ident")
            .arg(ident)
            .arg("-j")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        cmd
    }
}

/// Extra vars go to `env/extravars`; a stale file from an earlier job is removed.
async fn write_extravars(data_dir: &Path, job: &JobDescriptor) -> Result<()> {
    let env_dir = data_dir.join("env");
    tokio::fs::create_dir_all(&env_dir)
        .await
        .with_context(|| format!("create {}", env_dir.display()))?;
    let path = env_dir.join("extravars");

    let vars = job.extra_vars_map();
    if vars.is_empty() {
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e).with_context(|| format!("remove {}", path.display())),
        }
        return Ok(());
    }
    tokio::fs::write(&path, serde_json::to_vec(&vars)?)
        .await
        .with_context(|| format!("write {}", path.display()))
}

#[async_trait]
impl JobRunner for AnsibleRunnerPlugin {
    fn name(&self) -> &str {
        "ansible"
    }

    async fn run(&self, job: &JobDescriptor) -> Result<RunnerOutput> {
        let data_dir = self.data_dir()?;
        write_extravars(&data_dir, job).await?;

        let ident = uuid::Uuid::new_v4().to_string();
        let mut child = self
            .command(&data_dir, job, &ident)
            .spawn()
            .with_context(|| format!("failed to launch {}", self.bin))?;
        tracing::debug!(
            target: "fleetrun.runner",
            bin = %self.bin,
            ident = %ident,
            data_dir = %data_dir.display(),
            "ansible-runner started"
        );

        let stdout = child
            .stdout
            .take()
            .context("ansible-runner stdout not captured")?;
        let mut stderr = child
            .stderr
            .take()
            .context("ansible-runner stderr not captured")?;
        let stderr_task = tokio::spawn(async move {
            let mut buf = String::new();
            let _ = stderr.read_to_string(&mut buf).await;
            buf
        });

        let run = async {
            let mut events = Vec::new();
            let mut lines = BufReader::new(stdout).lines();
            while let Some(line) = lines.next_line().await? {
                match parse_event_line(&line) {
                    Some(ev) => events.push(ev),
                    None if !line.trim().is_empty() => {
                        tracing::trace!(target: "fleetrun.runner", line = %line, "non-event line")
                    }
                    None => {}
                }
            }
            let status = child.wait().await?;
            anyhow::Ok((events, status))
        };

        let (events, status) = match self.timeout {
            Some(limit) => {
                let outcome = tokio::time::timeout(limit, run).await;
                match outcome {
                    Ok(r) => r?,
                    Err(_) => {
                        let _ = child.kill().await;
                        anyhow::bail!(
                            "ansible-runner did not finish within {}ms (ident {ident})",
                            limit.as_millis()
                        );
                    }
                }
            }
            None => run.await?,
        };
        let stderr = stderr_task.await.unwrap_or_default();

        let rc = status.code();
        let host_events = events.iter().filter(|e| e.host().is_some()).count();
        if !status.success() && host_events == 0 {
            anyhow::bail!(
                "ansible-runner exited with {:?} before reaching any host: {}",
                rc,
                preview(&stderr)
            );
        }
        if !stderr.trim().is_empty() {
            tracing::debug!(target: "fleetrun.runner", stderr = %preview(&stderr), "ansible-runner stderr");
        }

        Ok(RunnerOutput::from_events(events, rc))
    }
}
