use serde::Serialize;
use sql_catalog::connector::{
    ConnectorRegistry, DatabaseConnector, DatabaseServerType, PluginCommand,
};

#[derive(Serialize)]
struct ConnectorInfo {
    server_type: DatabaseServerType,
    identifier_quote_string: String,
    url_template: String,
    help: PluginCommand,
    information_schema_views: Vec<String>,
}

impl ConnectorInfo {
    fn from_connector(connector: &dyn DatabaseConnector) -> Self {
        Self {
            server_type: connector.server_type().clone(),
            identifier_quote_string: connector.identifier_quote_string().to_string(),
            url_template: connector.connection_url_builder().template().to_string(),
            help: connector.help_command(),
            information_schema_views: connector
                .information_schema_views()
                .views
                .into_keys()
                .collect(),
        }
    }
}

pub fn run(json: bool) -> anyhow::Result<()> {
    let registry = ConnectorRegistry::with_defaults();
    let infos: Vec<ConnectorInfo> = registry.iter().map(ConnectorInfo::from_connector).collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&infos)?);
        return Ok(());
    }

    println!(
        "{:<12} {:<12} {:<6} URL template",
        "Server", "Name", "Quote"
    );
    println!("{}", "─".repeat(72));
    for info in &infos {
        println!(
            "{:<12} {:<12} {:<6} {}",
            info.server_type.id,
            info.server_type.name,
            info.identifier_quote_string,
            info.url_template
        );
        for option in &info.help.options {
            let help = option.help.replace('\n', " - ");
            println!("    --{:<10} {}", option.name, help);
        }
    }

    Ok(())
}
