use crate::cli::InspectArgs;
use crate::config::PartialConfig;
use crate::error::Result;
use molvox::workflows::inspect::{self, StructureInspection};
use tracing::info;

pub fn run(args: InspectArgs) -> Result<()> {
    let partial_config = PartialConfig::load(&args.grid)?;
    let config = partial_config.merge_with_cli(&args.grid, false)?;

    info!("Inspecting {:?}", &args.input);
    let inspection = inspect::run(&args.input, &config.core)?;
    print!("{}", render(&inspection, config.core.voxel_size));
    Ok(())
}

fn render(inspection: &StructureInspection, voxel_size: f64) -> String {
    let mut out = String::new();
    let min = inspection.bounds.min;
    let max = inspection.bounds.max;
    let [nx, ny, nz, nc] = inspection.grid_shape;

    out.push_str(&format!("Structure: {}\n", inspection.source.display()));
    out.push_str(&format!("Atoms:     {}\n", inspection.total_atoms));
    for (element, count) in &inspection.element_counts {
        out.push_str(&format!("  {:<3} {:>8}\n", element.symbol(), count));
    }
    out.push_str(&format!(
        "Bounds:    ({:.3}, {:.3}, {:.3}) to ({:.3}, {:.3}, {:.3})\n",
        min.x, min.y, min.z, max.x, max.y, max.z
    ));
    out.push_str(&format!(
        "Grid:      {}x{}x{}x{} at {} Å ({} bytes)\n",
        nx,
        ny,
        nz,
        nc,
        voxel_size,
        inspection.grid_bytes()
    ));
    out
}
