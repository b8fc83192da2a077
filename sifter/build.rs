use std::{env, error::Error};

use vergen_gitcl::{BuildBuilder, Emitter, GitclBuilder};

fn main() -> Result<(), Box<dyn Error>> {
    // describe with tags=true so that lightweight tags are picked up
    let git = GitclBuilder::default()
        .describe(true, true, None)
        .build()?;
    let mut build_builder = BuildBuilder::default();
    // In dev/test builds keep metadata stable so incremental builds stick.
    if env::var("PROFILE").unwrap_or_default() != "release" {
        // SAFETY: build scripts are single threaded
        unsafe { env::set_var("VERGEN_BUILD_DATE", "VERGEN_IDEMPOTENT_OUTPUT") };
    }
    build_builder.build_date(true);
    let build = build_builder.build()?;
    Emitter::default()
        .add_instructions(&build)?
        .add_instructions(&git)?
        .emit()?;
    Ok(())
}
