//! Print the OpenAPI document as JSON.

use std::io::Write as _;

use blog_backend::ApiDoc;
use color_eyre::eyre::Context;
use utoipa::OpenApi;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let json = ApiDoc::openapi()
        .to_pretty_json()
        .wrap_err("serialising OpenAPI document")?;
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{json}").wrap_err("writing OpenAPI document")?;
    Ok(())
}
