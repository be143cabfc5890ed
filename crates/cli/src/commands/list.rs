use anyhow::Result;
use strz_core::workspace::{
    EnumerateOptions, SNAPSHOT_FILE, enumerate_elements, find_workspace_dir, read_snapshot,
};

use super::resolve_cwd;
use crate::cli::GlobalArgs;
use crate::config::Settings;
use crate::display::print_elements;

pub fn list_command(
    global: &GlobalArgs,
    containers: bool,
    components: bool,
    deployment_nodes: bool,
) -> Result<()> {
    let cwd = resolve_cwd(global.cwd.as_deref())?;
    let settings = Settings::load(&cwd)?;
    let Some(workspace_dir) = find_workspace_dir(&cwd, &settings.workspace_folder) else {
        println!("❌ No workspace found in {}", cwd.display());
        return Ok(());
    };
    let Some(snapshot) = read_snapshot(Some(&workspace_dir))? else {
        println!(
            "❌ No {} in {}; export the workspace to JSON first",
            SNAPSHOT_FILE,
            workspace_dir.display()
        );
        return Ok(());
    };

    let options = EnumerateOptions {
        include_containers: containers,
        include_components: components,
        include_deployment_nodes: deployment_nodes,
    };
    let title = snapshot.name.as_deref().unwrap_or("Workspace");
    println!("🏛️  {} ({})", title, workspace_dir.display());
    print_elements(&enumerate_elements(&snapshot, options));
    Ok(())
}
