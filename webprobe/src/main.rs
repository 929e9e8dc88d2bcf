use clap::{CommandFactory, Parser};
use serde_json::json;
use webprobe::config::Args;
use webprobe::{Action, Command, Config, OutputFormat, Panel, telemetry};

fn action_for(command: &Command) -> Option<Action> {
    match command {
        Command::UploadFile { .. } => Some(Action::UploadFile),
        Command::UploadText { .. } => Some(Action::UploadText),
        Command::Fetch { .. } => Some(Action::Fetch),
        Command::Page | Command::Actions => None,
    }
}

fn print_actions(format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => {
            for action in Action::ALL {
                let inputs: Vec<&str> = action.inputs().iter().map(|field| field.as_str()).collect();
                println!("{:<12} inputs: {:<32} output: {}", action.name(), inputs.join(", "), action.output());
            }
        }
        OutputFormat::Json => {
            let actions: Vec<_> = Action::ALL
                .iter()
                .map(|action| {
                    json!({
                        "name": action.name(),
                        "inputs": action.inputs().iter().map(|field| field.as_str()).collect::<Vec<_>>(),
                        "output": action.output(),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&actions)?);
        }
    }
    Ok(())
}

fn print_panels(panels: &[Panel], format: OutputFormat, page: bool) -> anyhow::Result<()> {
    match (format, page) {
        (OutputFormat::Text, false) => {
            for panel in panels {
                println!("{}", panel.text);
            }
        }
        (OutputFormat::Text, true) => {
            for panel in panels {
                println!("== {} ==\n{}\n", panel.target, panel.text);
            }
        }
        (OutputFormat::Json, false) if panels.len() == 1 => {
            println!("{}", serde_json::to_string_pretty(&panels[0])?);
        }
        (OutputFormat::Json, _) => {
            println!("{}", serde_json::to_string_pretty(panels)?);
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI args
    let args = Args::parse();

    // Load configuration
    let config = Config::load(&args)?;

    // If --validate flag is set, exit successfully after config validation
    if args.validate {
        println!("Configuration is valid.");
        return Ok(());
    }

    let Some(command) = args.command.clone() else {
        Args::command().print_help()?;
        return Ok(());
    };

    telemetry::init_telemetry(&config.log_filter)?;

    tracing::debug!("{:?}", args);

    if command == Command::Actions {
        return print_actions(args.output);
    }

    // A selected file that cannot be read is a usage error, reported before anything is sent
    let inputs = config.form.clone().with_command(&command).load_inputs().await?;
    let registry = webprobe::registry(&config);

    match action_for(&command) {
        Some(action) => {
            let text = registry.invoke_by_name(action.name(), &inputs).await?;
            let panel = Panel {
                target: action.output(),
                text,
            };
            print_panels(&[panel], args.output, false)
        }
        None => {
            let panels = registry.invoke_all(&inputs).await;
            print_panels(&panels, args.output, true)
        }
    }
}
