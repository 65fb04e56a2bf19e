use anyhow::Context;
use sql_catalog::config::ConnectionConfig;
use sql_catalog::connector::ConnectorRegistry;
use sql_catalog::loader::{load_catalog, CatalogBuilder};
use sql_catalog::serialize::{ExportOptions, IdentityStrategy, JsonSerializedCatalog};
use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;
use std::time::Instant;

pub struct ExportArgs {
    pub file: PathBuf,
    pub output: Option<PathBuf>,
    pub server: Option<String>,
    pub url: Option<String>,
    pub config: Option<PathBuf>,
    pub database: Option<String>,
    pub uuid_ids: bool,
    pub compact: bool,
}

pub fn run(args: ExportArgs) -> anyhow::Result<()> {
    if !args.file.exists() {
        anyhow::bail!("input file does not exist: {}", args.file.display());
    }

    let from_file = match &args.config {
        Some(path) => ConnectionConfig::from_file(path)?,
        None => ConnectionConfig::default(),
    };
    let connection = from_file.merge(ConnectionConfig {
        server: args.server,
        url: args.url,
        database: args.database,
        ..Default::default()
    });

    let registry = ConnectorRegistry::with_defaults();
    let connector = registry.resolve(connection.server.as_deref(), connection.url.as_deref())?;

    let database = connection.database.clone().unwrap_or_else(|| {
        args.file
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "catalog".to_string())
    });

    let url = match &connection.url {
        Some(url) => Some(url.clone()),
        None => {
            let mut params = connection.to_params();
            params.insert("database".to_string(), database.clone());
            match connector.connection_url_builder().build(&params) {
                Ok(url) => Some(url),
                Err(e) => {
                    log::debug!("No connection URL recorded: {}", e);
                    None
                }
            }
        }
    };

    log::info!(
        "Loading {} with connector {}",
        args.file.display(),
        connector.server_type()
    );

    let start_time = Instant::now();
    let builder = CatalogBuilder::new(
        &database,
        connector.default_schema_name(&database),
        &connector.schema_retrieval_options(),
    );
    let input = File::open(&args.file)
        .with_context(|| format!("could not open {}", args.file.display()))?;
    let (mut catalog, stats) = load_catalog(BufReader::new(input), builder)
        .with_context(|| format!("could not read {}", args.file.display()))?;

    log::info!(
        "Read {} statements ({} schema, {} skipped)",
        stats.statements,
        stats.schema_statements,
        stats.skipped
    );
    if stats.unresolved_foreign_keys > 0 {
        eprintln!(
            "⚠ {} foreign key(s) reference unknown tables or columns and were left out",
            stats.unresolved_foreign_keys
        );
    }

    catalog
        .attributes
        .insert("source".to_string(), args.file.display().to_string());
    if let Some(url) = url {
        catalog.attributes.insert("url".to_string(), url);
    }

    let options = ExportOptions {
        identity: if args.uuid_ids {
            IdentityStrategy::Uuid
        } else {
            IdentityStrategy::Sequential
        },
        pretty: !args.compact,
    };
    let serialized = JsonSerializedCatalog::with_options(catalog, options);

    match &args.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("could not create {}", path.display()))?;
            serialized.save(file)?;
            eprintln!(
                "✓ Exported {} tables, {} foreign keys from {} statements to {} in {:.3?}",
                serialized.len(),
                serialized.foreign_keys.len(),
                stats.schema_statements,
                path.display(),
                start_time.elapsed()
            );
        }
        None => {
            let stdout = io::stdout();
            serialized.save(stdout.lock())?;
            println!();
        }
    }

    Ok(())
}
