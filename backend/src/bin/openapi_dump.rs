//! Print the tradepost OpenAPI document as pretty JSON.

use std::io::{self, Write as _};

use tradepost::ApiDoc;
use utoipa::OpenApi;

fn main() -> io::Result<()> {
    let document = ApiDoc::openapi()
        .to_pretty_json()
        .map_err(|error| io::Error::other(format!("serialise OpenAPI document: {error}")))?;
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{document}")
}
