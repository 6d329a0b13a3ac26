use clap::Args;
use episim::prelude::*;

/// Outbreak options layered on top of the standard runner arguments.
#[derive(Args, Debug)]
struct OutbreakArgs {
    /// Pathogen preset to simulate instead of the default parameters
    #[arg(short, long)]
    pathogen: Option<String>,

    /// Containment policy to enact before the outbreak starts (repeatable)
    #[arg(long)]
    policy: Vec<String>,
}

fn main() -> anyhow::Result<()> {
    let simulation = run_with_custom_args(
        |simulation, _, custom_args: Option<OutbreakArgs>| {
            let Some(args) = custom_args else {
                return Ok(());
            };

            if let Some(id) = &args.pathogen {
                let Some(preset) = find_pathogen(id) else {
                    return Err(format!("unknown pathogen: {id}").into());
                };
                println!("Simulating {}", preset.name);
                let config = preset.apply_to(simulation.config());
                simulation.update_config(config);
            }

            for id in &args.policy {
                simulation.implement_policy(id);
            }
            Ok(())
        },
    )?;

    let state = simulation.state();
    println!("Simulated {} days", state.day);
    println!("  total cases: {}", state.total_cases);
    println!("  recovered:   {}", state.recovered);
    println!("  deceased:    {}", state.deceased);
    println!("  total cost:  ${:.2}", state.total_costs);
    if state.is_game_over {
        let outcome = if state.has_won { "contained" } else { "lost" };
        println!("  outcome:     outbreak {outcome} on day {}", state.day);
    }
    Ok(())
}
