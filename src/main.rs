use bevy::log::LogPlugin;
use bevy::prelude::*;
use clap::Parser;

use bevy_agent_editor::cli::CliArgs;
use bevy_agent_editor::probe::ProbeConfig;
use bevy_agent_editor::{EditorRenderPlugin, InteractionCorePlugin};

fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();
    args.validate()?;

    App::new()
        .add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "Agent Scene Editor".into(),
                        ..default()
                    }),
                    ..default()
                })
                .set(LogPlugin {
                    filter: args.log_filter.clone(),
                    ..default()
                }),
        )
        .insert_resource(ProbeConfig::from_args(&args))
        .insert_resource(args)
        .add_plugins((InteractionCorePlugin, EditorRenderPlugin))
        .run();

    Ok(())
}
