use anyhow::Result;
use patchquery::LabelCatalog;

pub fn run(_cli: &crate::cli::Cli, args: &crate::cli::LabelsArgs) -> Result<()> {
    let catalog = LabelCatalog::new();

    if args.codes {
        for &label in catalog.labels() {
            if let Some(code) = catalog.code(label) {
                println!("{code}\t{label}");
            }
        }
    } else {
        catalog.labels_sorted().into_iter().for_each(|label| println!("{label}"));
    }

    Ok(())
}
