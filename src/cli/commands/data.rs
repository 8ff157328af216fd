use clap::Subcommand;
use serde_json::{json, Value};

use crate::cli::prompt::{read_stdin_json, StdinConfirm};
use crate::cli::utils::{output_data, output_records, output_success};
use crate::cli::OutputFormat;
use crate::pages::{AssumeYes, Confirm, Console, Deletion, PageScope};
use crate::resources::Resource;

#[derive(Subcommand)]
pub enum DataCommands {
    #[command(about = "List the records of a collection")]
    List {
        #[arg(help = "Collection (productos, empleados, usuarios, ...)")]
        resource: Resource,
        #[arg(long, help = "Only rows containing this text")]
        filter: Option<String>,
    },

    #[command(about = "Show one record")]
    Show {
        #[arg(help = "Collection")]
        resource: Resource,
        #[arg(help = "Record ID")]
        id: String,
    },

    #[command(about = "Create a record from JSON on stdin")]
    Create {
        #[arg(help = "Collection")]
        resource: Resource,
    },

    #[command(about = "Update a record from (partial) JSON on stdin")]
    Update {
        #[arg(help = "Collection")]
        resource: Resource,
        #[arg(help = "Record ID")]
        id: String,
    },

    #[command(about = "Delete a record after confirmation")]
    Delete {
        #[arg(help = "Collection")]
        resource: Resource,
        #[arg(help = "Record ID")]
        id: String,
        #[arg(long, short = 'y', help = "Do not ask for confirmation")]
        yes: bool,
    },

    #[command(about = "Show the lists a collection's form picks from")]
    Catalogs {
        #[arg(help = "Collection")]
        resource: Resource,
    },
}

pub async fn handle(
    cmd: DataCommands,
    console: &Console,
    scope: &PageScope,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    match cmd {
        DataCommands::List { resource, filter } => {
            let page = console.open_list(resource, scope).await?;
            let rows = page.filter(filter.as_deref().unwrap_or(""));
            output_records(&output_format, resource, &rows)
        }
        DataCommands::Show { resource, id } => {
            let record = console.show(resource, &id, scope).await?;
            output_data(&output_format, &record)
        }
        DataCommands::Create { resource } => {
            let body = read_stdin_json().await?;
            let created = console.create(resource, body, scope).await?;
            output_success(
                &output_format,
                &format!("Registro creado en {}", resource.title()),
                Some(json!({ "record": created.unwrap_or(Value::Null) })),
            )
        }
        DataCommands::Update { resource, id } => {
            let body = read_stdin_json().await?;
            let updated = console.update(resource, &id, body, scope).await?;
            output_success(
                &output_format,
                &format!("Registro {} actualizado en {}", id, resource.title()),
                Some(json!({ "record": updated.unwrap_or(Value::Null) })),
            )
        }
        DataCommands::Delete { resource, id, yes } => {
            let confirm: &dyn Confirm = if yes { &AssumeYes } else { &StdinConfirm };

            // Same flow as the list page: load, confirm with the record's name, delete
            let mut page = console.open_list(resource, scope).await?;
            if page.find(&id).is_none() {
                anyhow::bail!("{} no tiene un registro con ID {}", resource.title(), id);
            }

            match page.delete(console, &id, confirm, scope).await? {
                Deletion::Deleted => output_success(
                    &output_format,
                    &format!("Registro {} eliminado de {} ({} restantes)", id, resource.title(), page.len()),
                    Some(json!({ "deleted": id, "remaining": page.len() })),
                ),
                Deletion::Declined => output_success(&output_format, "Eliminación cancelada", Some(json!({ "deleted": null }))),
            }
        }
        DataCommands::Catalogs { resource } => {
            let catalogs = console.form_catalogs(resource, scope).await?;
            if catalogs.is_empty() {
                return output_success(
                    &output_format,
                    &format!("El formulario de {} no usa listas auxiliares", resource.title()),
                    None,
                );
            }

            for catalog in &catalogs {
                if let OutputFormat::Text = output_format {
                    println!("== {}", catalog.resource.title());
                }
                let rows: Vec<&Value> = catalog.items.iter().collect();
                output_records(&output_format, catalog.resource, &rows)?;
            }
            Ok(())
        }
    }
}
