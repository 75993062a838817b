use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use dispatcher::{normalize_controller_name, resolve_action, template_id, RequestContext, RouteTable};
use shared::domain::ActionName;

#[derive(Parser, Debug)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the conventional route patterns in match order.
    Routes,
    /// Show which controller action a request would reach, with the exact
    /// template id before any new/create fallback.
    Resolve {
        method: String,
        /// Request target, path plus optional query.
        target: String,
        /// Extra form fields as `name=value`.
        #[arg(long = "param", value_name = "NAME=VALUE")]
        params: Vec<String>,
    },
    /// List the seven action templates for a controller.
    Templates { controller: String },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Routes => {
            for route in RouteTable::conventional().routes() {
                println!("{:<10} {}", route.kind().as_str(), route.pattern());
            }
        }
        Command::Resolve {
            method,
            target,
            params,
        } => println!("{}", explain(&method, &target, &params)?),
        Command::Templates { controller } => {
            let controller = normalize_controller_name(&controller)
                .ok_or_else(|| anyhow!("'{controller}' is not a valid controller name"))?;
            for action in ActionName::ALL {
                println!("{:<8} {}", action.as_str(), template_id(&controller, action));
            }
        }
    }

    Ok(())
}

fn explain(method: &str, target: &str, params: &[String]) -> Result<String> {
    let mut request = RequestContext::new(method, target);
    for param in params {
        let (name, value) = param
            .split_once('=')
            .ok_or_else(|| anyhow!("expected NAME=VALUE, got '{param}'"))?;
        request = request.with_param(name, value);
    }

    let route = RouteTable::conventional()
        .match_path(request.path())
        .ok_or_else(|| anyhow!("no route for '{}'", request.path()))?;
    let action = resolve_action(route.kind, request.method(), request.params())?;

    Ok(format!(
        "route={} controller={} key={} action={} template_id={}",
        route.kind,
        route.controller,
        route.key.as_deref().unwrap_or("-"),
        action,
        template_id(&route.controller, action)
    ))
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
