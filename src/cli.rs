use crate::config::load_config;
use crate::layout::{compute_architecture_layout, compute_workflow_layout};
use crate::layout_dump::{LayoutDump, write_layout_dump};
use crate::model::{SelectionState, Workspace};
use crate::workspace::{SAMPLE_WORKSPACES, load_workspace};
use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::collections::HashSet;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "sysviz", version, about = "Layout engine for system test-readiness graphs")]
pub struct Args {
    /// Workspace file (JSON5). Defaults to the built-in sample workspace.
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file for the layout dump. Defaults to stdout.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Which canvas view to lay out
    #[arg(short = 'v', long = "view", value_enum, default_value = "architecture")]
    pub view: View,

    /// System id to focus; defaults to the workspace root
    #[arg(short = 's', long = "system")]
    pub system: Option<String>,

    /// Architecture view: keep every node except the root collapsed
    #[arg(long = "collapsed")]
    pub collapsed: bool,

    /// Config JSON file overriding layout geometry
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum View {
    Architecture,
    Workflow,
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    let config = load_config(args.config.as_deref())?;

    let workspace: Workspace = match args.input.as_deref() {
        Some(path) => load_workspace(path)?,
        None => SAMPLE_WORKSPACES[0].clone(),
    };

    let focus = match args.system.as_deref() {
        Some(id) => workspace
            .root
            .find(id)
            .ok_or_else(|| anyhow::anyhow!("no system '{}' in workspace '{}'", id, workspace.name))?,
        None => &workspace.root,
    };
    let selection = SelectionState::default();

    let dump = match args.view {
        View::Architecture => {
            let expanded: HashSet<String> = if args.collapsed {
                [workspace.root.id.clone()].into()
            } else {
                workspace.root.all_ids()
            };
            let layout = compute_architecture_layout(
                &workspace.root,
                &expanded,
                &selection,
                &config.architecture,
            );
            LayoutDump::from_architecture(&layout, &workspace.name)
        }
        View::Workflow => {
            let layout = compute_workflow_layout(focus, &selection, &config.workflow)?;
            LayoutDump::from_workflow(&layout, &focus.name)
        }
    };

    write_layout_dump(args.output.as_deref(), &dump)?;
    Ok(())
}
