use anyhow::{bail, Result};
use page_translator::{Config, Runtime, Translator};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored when not present)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("page_translator=info".parse()?),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let Some(lang) = args.next() else {
        bail!("usage: page-translator <language> <key>...");
    };
    let keys: Vec<String> = args.collect();
    if keys.is_empty() {
        bail!("usage: page-translator <language> <key>...");
    }

    // Load configuration from environment
    let config = Config::from_env()?;
    let root = std::env::var("TRANSLATOR_ROOT").unwrap_or_else(|_| ".".to_string());
    info!("Reading resources under {}{}", root, config.files_location);

    let translator = Translator::new(config, Runtime::filesystem(root));
    let default_language = translator.default_language();

    let mut sources = vec![lang.clone()];
    if default_language.as_str() != lang {
        sources.push(default_language.to_string());
    }

    let loaded = translator.fetch(sources, true).await;
    if !translator.has(&lang) {
        bail!("No resource could be loaded for \"{}\"", lang);
    }
    info!("Loaded {} resources", loaded.len());

    for key in &keys {
        match translator.translate_for_key(key, Some(lang.as_str())) {
            Some(value) => println!("{}\t{}", key, value),
            None => println!("{}\t<missing>", key),
        }
    }

    Ok(())
}
