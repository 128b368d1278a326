//! Command bodies for `dun harness ...` and `dun selftest`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use chrono::Utc;
use tokio_util::sync::CancellationToken;
use tracing::info;

use dun_core::compare::group_by_agreement;
use dun_core::harness::{
    AutomationMode, HarnessCache, HarnessConfig, HarnessRegistry, HarnessStatus, MockHarness,
    execute_harness, execute_harness_with, ping_harness,
};

use crate::config::DunConfig;

/// `dun harness list` -- print registered harness names, sorted.
pub fn cmd_list(registry: &HarnessRegistry) -> Result<()> {
    let mut names = registry.list();
    names.sort();
    for name in names {
        println!("{name}");
    }
    Ok(())
}

/// `dun harness exec` -- run one harness and print its response.
///
/// The resolved timeout, automation mode, and per-harness command override
/// all flow into the execution.
pub async fn cmd_exec(
    cancel: &CancellationToken,
    registry: &HarnessRegistry,
    config: &DunConfig,
    name: &str,
    prompt: &str,
    work_dir: Option<&Path>,
) -> Result<()> {
    let harness_config = HarnessConfig {
        command: config.commands.get(name).cloned(),
        timeout: config.timeout.unwrap_or_default(),
        automation: Some(config.mode),
        work_dir: work_dir.map(Path::to_path_buf),
        ..Default::default()
    };
    let result = execute_harness_with(cancel, registry, name, prompt, harness_config).await;
    match result.error {
        Some(error) => bail!("{error}"),
        None => {
            print!("{}", result.response);
            info!(
                harness = name,
                duration_ms = result.duration.as_millis() as u64,
                "harness execution finished"
            );
            Ok(())
        }
    }
}

/// `dun harness ping` -- probe one harness and print its liveness.
pub async fn cmd_ping(
    cancel: &CancellationToken,
    registry: &HarnessRegistry,
    config: &DunConfig,
    name: &str,
) -> Result<()> {
    let harness_config = HarnessConfig {
        command: config.commands.get(name).cloned(),
        timeout: config.timeout.unwrap_or_default(),
        ..Default::default()
    };
    let liveness = ping_harness(cancel, registry, name, harness_config).await?;

    if liveness.live {
        let model = if liveness.model.is_empty() {
            "?"
        } else {
            &liveness.model
        };
        println!(
            "{name}: live (model {model}, {}ms){}",
            liveness.duration.as_millis(),
            if liveness.detail.is_empty() {
                String::new()
            } else {
                format!(" -- {}", liveness.detail)
            }
        );
        Ok(())
    } else {
        bail!("{name}: not live -- {}", liveness.detail);
    }
}

/// `dun harness doctor` -- probe every registered harness, persist the
/// availability cache, and print a summary.
pub async fn cmd_doctor(
    cancel: &CancellationToken,
    registry: &HarnessRegistry,
    config: &DunConfig,
    cache_path: Option<&Path>,
) -> Result<()> {
    let mut names = registry.list();
    names.sort();

    let mut statuses = Vec::new();
    for name in &names {
        let command = config
            .commands
            .get(name)
            .cloned()
            .unwrap_or_else(|| name.clone());
        // The mock answers without a binary, so it is always available.
        let available = name == "mock" || find_in_path(&command).is_some();
        let mut status = HarnessStatus {
            name: name.clone(),
            command: command.clone(),
            available,
            detail: if available {
                String::new()
            } else {
                format!("{command} not found on PATH")
            },
            ..Default::default()
        };

        if available {
            let harness_config = HarnessConfig {
                command: Some(command),
                timeout: config.timeout.unwrap_or_default(),
                ..Default::default()
            };
            let liveness = ping_harness(cancel, registry, name, harness_config).await?;
            status.live = liveness.live;
            status.model = liveness.model;
            status.live_detail = liveness.detail;
        }

        let verdict = match (status.available, status.live) {
            (true, true) => "ok",
            (true, false) => "installed but not responding",
            (false, _) => "not installed",
        };
        println!("{name:10} {verdict}  {}", status.live_detail);
        statuses.push(status);
    }

    let cache = HarnessCache {
        last_check: Some(Utc::now()),
        harnesses: statuses,
    };
    match cache_path {
        Some(path) => cache.save_to(path)?,
        None => cache.save()?,
    }
    println!(
        "\n{} of {} harnesses available; cache updated",
        cache.available_harnesses().len(),
        cache.harnesses.len()
    );
    Ok(())
}

/// `dun selftest` -- exercise the registry, mock harness, ping parsing,
/// and agreement grouping without any live process.
pub async fn cmd_selftest(cancel: &CancellationToken) -> Result<()> {
    let registry = HarnessRegistry::new();
    for (name, response) in [
        ("mock-a", "{\"sum\": 4}"),
        ("mock-b", "{\"sum\":4} // agreed"),
        ("mock-c", "something else"),
    ] {
        let response = response.to_string();
        registry.register(name, move |config| {
            Box::new(MockHarness::new(HarnessConfig {
                mock_response: response.clone(),
                ..config
            }))
        });
    }

    let mut results = Vec::new();
    for name in ["mock-a", "mock-b", "mock-c"] {
        results.push(
            execute_harness(cancel, &registry, name, "2+2?", AutomationMode::Auto, None).await,
        );
    }
    if results.iter().any(|r| r.is_err()) {
        bail!("selftest: mock execution failed");
    }

    let groups = group_by_agreement(&results, None);
    if groups.len() != 2 || groups[0].members.len() != 2 {
        bail!(
            "selftest: expected a majority group of 2, got {:?}",
            groups
                .iter()
                .map(|g| g.members.len())
                .collect::<Vec<_>>()
        );
    }

    registry.register("probe", |config| {
        Box::new(MockHarness::new(HarnessConfig {
            mock_response: "{\"ok\":true,\"model\":\"selftest\"}".to_string(),
            ..config
        }))
    });
    let liveness = ping_harness(cancel, &registry, "probe", HarnessConfig::default())
        .await
        .context("selftest: ping failed")?;
    if !liveness.live || liveness.model != "selftest" {
        bail!("selftest: unexpected liveness {liveness:?}");
    }

    println!("selftest ok: registry, mock execution, grouping, ping");
    Ok(())
}

/// Search `$PATH` for an executable. An explicit path is checked directly.
fn find_in_path(command: &str) -> Option<PathBuf> {
    fn executable(path: &Path) -> bool {
        if !path.is_file() {
            return false;
        }
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::metadata(path)
                .map(|m| m.permissions().mode() & 0o111 != 0)
                .unwrap_or(false)
        }
        #[cfg(not(unix))]
        {
            true
        }
    }

    let candidate = Path::new(command);
    if candidate.components().count() > 1 {
        return executable(candidate).then(|| candidate.to_path_buf());
    }

    let path_var = std::env::var_os("PATH")?;
    std::env::split_paths(&path_var)
        .map(|dir| dir.join(command))
        .find(|path| executable(path))
}
