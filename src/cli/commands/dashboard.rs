use serde_json::json;

use crate::cli::utils::{output_success, render_table};
use crate::cli::OutputFormat;
use crate::pages::{Console, PageScope};

pub async fn handle(console: &Console, scope: &PageScope, output_format: OutputFormat) -> anyhow::Result<()> {
    let dashboard = console.dashboard(scope).await?;

    match output_format {
        OutputFormat::Json => output_success(
            &output_format,
            "Panel cargado",
            Some(json!({ "dashboard": dashboard })),
        ),
        OutputFormat::Text => {
            println!(
                "Panel KVC - {} ({})",
                dashboard.user.display_name(),
                dashboard.user.role_label()
            );
            if let Some(message) = &dashboard.message {
                eprintln!("{}", message);
            }
            if dashboard.counters.is_empty() {
                println!("Su rol todavía no tiene módulos asignados.");
                return Ok(());
            }

            let rows: Vec<Vec<String>> = dashboard
                .counters
                .iter()
                .map(|c| {
                    let count = c.count.map(|n| n.to_string()).unwrap_or_else(|| "no disponible".into());
                    vec![c.title.to_string(), count]
                })
                .collect();
            print!("{}", render_table(&["Módulo", "Registros"], &rows));
            Ok(())
        }
    }
}
