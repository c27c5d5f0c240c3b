use jusku_core::config::{AppConfig, LoadOptions};
use jusku_db::connect_with_settings;
use serde_json::json;

struct DoctorCheck {
    name: &'static str,
    passed: bool,
    detail: String,
}

/// Validate config and database connectivity, reporting per-check results.
pub fn run(json_output: bool) -> String {
    let mut checks = Vec::new();

    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => {
            checks.push(DoctorCheck {
                name: "config",
                passed: true,
                detail: "configuration loaded and validated".to_string(),
            });
            Some(config)
        }
        Err(error) => {
            checks.push(DoctorCheck {
                name: "config",
                passed: false,
                detail: format!("configuration issue: {error}"),
            });
            None
        }
    };

    if let Some(config) = &config {
        checks.push(database_check(config));
    }

    render(&checks, json_output)
}

fn database_check(config: &AppConfig) -> DoctorCheck {
    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => {
            return DoctorCheck {
                name: "database",
                passed: false,
                detail: format!("failed to initialize async runtime: {error}"),
            };
        }
    };

    let result = runtime.block_on(async {
        let pool = connect_with_settings(
            &config.database.url,
            config.database.max_connections,
            config.database.timeout_secs,
        )
        .await?;
        let outcome = sqlx::query_scalar::<_, i64>("SELECT 1").fetch_one(&pool).await;
        pool.close().await;
        outcome
    });

    match result {
        Ok(_) => DoctorCheck {
            name: "database",
            passed: true,
            detail: "database reachable".to_string(),
        },
        Err(error) => DoctorCheck {
            name: "database",
            passed: false,
            detail: format!("database check failed: {error}"),
        },
    }
}

fn render(checks: &[DoctorCheck], json_output: bool) -> String {
    let all_passed = checks.iter().all(|check| check.passed);

    if json_output {
        let payload = json!({
            "command": "doctor",
            "status": if all_passed { "ok" } else { "error" },
            "checks": checks
                .iter()
                .map(|check| {
                    json!({
                        "name": check.name,
                        "passed": check.passed,
                        "detail": check.detail,
                    })
                })
                .collect::<Vec<_>>(),
        });
        return serde_json::to_string_pretty(&payload).unwrap_or_else(|_| payload.to_string());
    }

    let mut lines = Vec::with_capacity(checks.len() + 1);
    for check in checks {
        let marker = if check.passed { "ok" } else { "FAIL" };
        lines.push(format!("[{marker}] {}: {}", check.name, check.detail));
    }
    lines.push(if all_passed {
        "All checks passed.".to_string()
    } else {
        "Some checks failed.".to_string()
    });
    lines.join("\n")
}
