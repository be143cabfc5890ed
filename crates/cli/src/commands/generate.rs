use anyhow::{Result, bail};
use strz_core::Error;
use strz_core::actions::ActionExecutor;
use strz_core::prompt::Prompter;
use tracing::{debug, info};

use super::resolve_cwd;
use crate::cli::GlobalArgs;
use crate::config::Settings;
use crate::display::print_summary;
use crate::generators::{Generator, GeneratorContext};
use crate::prompt::{AnswerFilePrompter, TerminalPrompter};
use crate::templates::load_registry;

pub fn generate_command(generator: Generator, global: &GlobalArgs) -> Result<()> {
    let cwd = resolve_cwd(global.cwd.as_deref())?;
    let settings = Settings::load(&cwd)?.with_dry_run(global.dry_run);
    let ctx = GeneratorContext::load(settings)?;
    debug!("Workspace: {:?}, snapshot loaded: {}", ctx.workspace_dir, ctx.snapshot.is_some());

    let mut prompter: Box<dyn Prompter> = match &global.answers {
        Some(path) => Box::new(AnswerFilePrompter::from_file(path)?),
        None => Box::new(TerminalPrompter::stdio()),
    };

    println!("{} {}", generator.emoji(), generator.title());
    let plan = match generator.plan(&ctx, prompter.as_mut()) {
        Ok(plan) => plan,
        Err(e) if matches!(e.downcast_ref::<Error>(), Some(Error::Aborted)) => {
            println!("🛑 Aborted, nothing was written");
            return Ok(());
        }
        Err(e) => return Err(e),
    };

    if plan.actions.is_empty() {
        println!("Nothing to do");
        return Ok(());
    }

    let registry = load_registry(&ctx.settings)?;
    if ctx.settings.dry_run {
        println!("🔍 Dry run, planned actions:");
        for action in &plan.actions {
            println!("   • {}", strz_core::templates::render(&action.describe(), &plan.data));
        }
    }

    let executor = ActionExecutor::new(&plan.destination, &registry).with_dry_run(ctx.settings.dry_run);
    let summary = executor.run(&plan.actions, &plan.data);
    print_summary(&summary, &plan.destination);
    info!("{} finished", generator.title());

    if summary.has_failures() {
        bail!("{} action(s) failed", summary.failed());
    }
    Ok(())
}
