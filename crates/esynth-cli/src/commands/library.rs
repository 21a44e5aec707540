use crate::cli::{LibraryArgs, LibraryCommands};
use crate::error::Result;
use esynth::core::chem::GraphChemistry;
use esynth::core::library::FragmentLibrary;
use esynth::core::models::fragment::Fragment;
use std::fmt::Write as _;
use std::path::Path;
use tracing::info;

pub fn run(args: LibraryArgs) -> Result<()> {
    match args.command {
        LibraryCommands::Inspect { path } => inspect(&path),
    }
}

fn inspect(path: &Path) -> Result<()> {
    info!("Loading fragment library from {:?}", path);
    let library = FragmentLibrary::load(path, &GraphChemistry)?;

    let bricks = library.bricks().count();
    println!(
        "{} template(s): {} brick(s), {} linker(s)",
        library.len(),
        bricks,
        library.len() - bricks
    );
    for template in library.templates() {
        print!("{}", describe(template));
    }
    Ok(())
}

fn describe(template: &Fragment) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}  [{}]", template, template.index());
    for (_, atom) in template.open_connection_points() {
        let allow: Vec<&str> = atom.allowable_types().iter().map(|t| t.as_str()).collect();
        let _ = writeln!(
            out,
            "    site {:>3}  {:<8} max {}  {:<8} allow [{}]",
            atom.site(),
            atom.atom_type().as_str(),
            atom.max_connect(),
            atom.kind(),
            allow.join(", ")
        );
    }
    out
}
