use jusku_core::config::{AppConfig, LoadOptions};
use serde_json::json;

/// Print the effective configuration after file, environment, and default
/// resolution.
pub fn run() -> String {
    match AppConfig::load(LoadOptions::default()) {
        Ok(config) => render(&config),
        Err(error) => json!({
            "command": "config",
            "status": "error",
            "message": format!("configuration issue: {error}"),
        })
        .to_string(),
    }
}

fn render(config: &AppConfig) -> String {
    let payload = json!({
        "command": "config",
        "status": "ok",
        "config": {
            "database": {
                "url": config.database.url,
                "max_connections": config.database.max_connections,
                "timeout_secs": config.database.timeout_secs,
            },
            "server": {
                "bind_address": config.server.bind_address,
                "port": config.server.port,
                "graceful_shutdown_secs": config.server.graceful_shutdown_secs,
            },
            "delivery": {
                "base_fee": config.delivery.base_fee,
                "per_km_fee": config.delivery.per_km_fee,
                "base_minutes": config.delivery.base_minutes,
                "minutes_per_km": config.delivery.minutes_per_km,
                "max_radius_km": config.delivery.max_radius_km,
            },
            "logging": {
                "level": config.logging.level,
                "format": format!("{:?}", config.logging.format).to_lowercase(),
            },
        },
    });

    serde_json::to_string_pretty(&payload).unwrap_or_else(|_| payload.to_string())
}

#[cfg(test)]
mod tests {
    use jusku_core::config::AppConfig;

    use super::render;

    #[test]
    fn render_includes_every_section() {
        let output = render(&AppConfig::default());

        for key in ["database", "server", "delivery", "logging", "max_radius_km"] {
            assert!(output.contains(key), "missing `{key}` in output");
        }
    }
}
