//! `dockyard cache` command

use anyhow::Result;

use crate::cli::CacheArgs;
use dockyard::ops::{list_cache, resolve_config};
use dockyard::util::fs::format_size;
use dockyard::util::GlobalContext;

pub fn execute(args: CacheArgs, gctx: &GlobalContext) -> Result<()> {
    let args = args.normalized();
    let (project, config) = resolve_config(gctx, &args.options)?;
    let listings = list_cache(&project, &config)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&listings)?);
        return Ok(());
    }

    for listing in &listings {
        println!("{} ({})", listing.dependency, listing.dir.display());
        if listing.entries.is_empty() {
            println!("  (empty)");
        }
        for entry in &listing.entries {
            println!(
                "  {:<24} {}{}  {}",
                entry.library,
                entry.revision,
                if entry.dirty { " (dirty)" } else { "" },
                format_size(entry.size)
            );
        }
    }

    Ok(())
}
