//! dashboard-runner: headless driver for the relief dashboard core.
//!
//! Usage:
//!   dashboard-runner --seed 12345
//!   dashboard-runner --records records.json --config dashboard.json --top 5
//!   dashboard-runner --seed 12345 --ipc-mode   (JSON actions on stdin, snapshots on stdout)

use anyhow::Result;
use relief_core::{
    action::DashboardAction,
    config::DashboardConfig,
    engine::DashboardEngine,
    fixture::FixtureLoader,
    listener::StateListener,
    loader::{JsonFileLoader, RecordLoader},
    reducer::{AppState, LoadPhase},
};
use std::env;
use std::io::{self, BufRead, Write};

#[derive(serde::Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
enum IpcControl {
    GetState,
    Reload,
    Quit,
}

enum IpcLine {
    Control(IpcControl),
    Action(DashboardAction),
}

impl IpcLine {
    /// Controls first; anything else must be a full action, and its own
    /// parse error is what the client sees.
    fn parse(line: &str) -> serde_json::Result<Self> {
        if let Ok(control) = serde_json::from_str::<IpcControl>(line) {
            return Ok(Self::Control(control));
        }
        serde_json::from_str::<DashboardAction>(line).map(Self::Action)
    }
}

/// Mirrors every transition into the log so IPC sessions can be traced.
struct TransitionLog;

impl StateListener for TransitionLog {
    fn name(&self) -> &'static str {
        "transition_log"
    }

    fn on_state_changed(&mut self, state: &AppState, action: &'static str) {
        log::info!(
            "revision={} action={action} phase={:?} filtered={}/{}",
            state.revision(),
            state.phase(),
            state.filtered_count(),
            state.records().len(),
        );
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let seed = parse_arg(&args, "--seed", 42u64);
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");
    let json_out = args.iter().any(|a| a == "--json");
    let records_path = flag_value(&args, "--records");

    let mut config = match flag_value(&args, "--config") {
        Some(path) => DashboardConfig::load(path)?,
        None => DashboardConfig::default(),
    };
    config.view.top_n = parse_arg(&args, "--top", config.view.top_n);

    let mut loader: Box<dyn RecordLoader> = match records_path {
        Some(path) => Box::new(JsonFileLoader::new(path, config.fiscal_calendar)),
        None => Box::new(FixtureLoader::new(
            seed,
            config.fixture.clone(),
            config.fiscal_calendar,
        )),
    };

    if !ipc_mode {
        println!("Relief Spending Dashboard: dashboard-runner");
        println!("  source:    {}", loader.describe());
        println!("  calendar:  {:?}", config.fiscal_calendar);
        println!("  top n:     {}", config.view.top_n);
        println!();
    }

    let mut engine = DashboardEngine::from_config(&config);
    engine.subscribe(Box::new(TransitionLog));
    engine.load_with(loader.as_mut())?;

    if ipc_mode {
        return run_ipc_loop(&mut engine, loader.as_mut());
    }

    if engine.state().phase() == LoadPhase::Error {
        anyhow::bail!(
            "record load failed: {}",
            engine.state().error().unwrap_or("unknown error")
        );
    }

    if json_out {
        println!("{}", serde_json::to_string_pretty(&engine.snapshot())?);
    } else {
        print_summary(engine.state());
    }
    Ok(())
}

fn run_ipc_loop(engine: &mut DashboardEngine, loader: &mut dyn RecordLoader) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut handle = stdin.lock();
    let mut buffer = String::new();

    // Initial state so the consumer can render before sending anything.
    writeln!(stdout, "{}", serde_json::to_string(&engine.snapshot())?)?;
    stdout.flush()?;

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }
        if buffer.trim().is_empty() {
            continue;
        }

        let line = match IpcLine::parse(&buffer) {
            Ok(l) => l,
            Err(e) => {
                write_error(&mut stdout, &e.to_string())?;
                continue;
            }
        };

        match line {
            IpcLine::Control(IpcControl::Quit) => break,
            IpcLine::Control(IpcControl::GetState) => {}
            IpcLine::Control(IpcControl::Reload) => {
                if let Err(e) = engine.load_with(loader) {
                    log::warn!("reload rejected: {e}");
                    write_error(&mut stdout, &e.to_string())?;
                    continue;
                }
            }
            IpcLine::Action(action) => {
                if let Err(e) = engine.dispatch(action) {
                    write_error(&mut stdout, &e.to_string())?;
                    continue;
                }
            }
        }
        writeln!(stdout, "{}", serde_json::to_string(&engine.snapshot())?)?;
        stdout.flush()?;
    }
    Ok(())
}

fn write_error(out: &mut impl Write, message: &str) -> Result<()> {
    writeln!(out, "{}", serde_json::json!({ "error": message }))?;
    out.flush()?;
    Ok(())
}

fn print_summary(state: &AppState) {
    let view = state.view();
    let s = &view.summary;

    println!("=== SUMMARY ===");
    println!("  records:        {}", s.record_count);
    println!("  allocations:    ${:.0}", s.total_allocations);
    println!("  deallocations:  ${:.0}", s.total_deallocations);
    println!("  net:            ${:.0}", s.net_obligations);
    println!("  outlays:        ${:.0}", s.total_outlays);
    println!("  emergency:      ${:.0}", s.emergency_allocations);
    println!("  recipients:     {}", s.recipient_count);
    println!("  programs:       {}", s.program_count);
    println!("  states:         {}", s.state_count);

    println!();
    println!("=== EMERGENCY FUNDING ===");
    if view.emergency_funding.is_empty() {
        println!("  (no allocations)");
    }
    for slice in &view.emergency_funding {
        println!(
            "  {:<42} ${:>16.0}  {:>5.1}%",
            slice.act.label(),
            slice.amount,
            slice.percentage * 100.0
        );
    }

    for (title, entities) in [
        ("TOP RECIPIENTS", &view.top_recipients),
        ("TOP PROGRAMS", &view.top_programs),
    ] {
        println!();
        println!("=== {title} ===");
        for e in entities {
            println!(
                "  {:<46} +${:>14.0}  -${:>12.0}",
                e.name, e.allocations, e.deallocations
            );
        }
    }

    println!();
    println!("=== TOP STATES ===");
    let mut states: Vec<_> = view.geo.iter().filter(|g| g.allocations > 0.0).collect();
    states.sort_by(|a, b| b.allocations.total_cmp(&a.allocations));
    for g in states.iter().take(5) {
        println!(
            "  {} {:<22} ${:>16.0}  recipients: {}",
            g.state, g.state_name, g.allocations, g.recipient_count
        );
    }
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn control_lines_parse_as_controls() {
        for (line, expected) in [
            (r#"{"type":"GET_STATE"}"#, "get_state"),
            (r#"{"type":"RELOAD"}"#, "reload"),
            (r#"{"type":"QUIT"}"#, "quit"),
        ] {
            let parsed = match IpcLine::parse(line).unwrap() {
                IpcLine::Control(IpcControl::GetState) => "get_state",
                IpcLine::Control(IpcControl::Reload) => "reload",
                IpcLine::Control(IpcControl::Quit) => "quit",
                IpcLine::Action(_) => "action",
            };
            assert_eq!(parsed, expected);
        }
    }

    #[test]
    fn action_lines_parse_as_actions() {
        let line = r#"{"type":"TOGGLE_EMERGENCY_FUNDING","act":"CARES Act"}"#;
        assert!(matches!(
            IpcLine::parse(line).unwrap(),
            IpcLine::Action(DashboardAction::ToggleEmergencyFunding { .. })
        ));
    }

    #[test]
    fn malformed_action_reports_its_own_error() {
        let err = IpcLine::parse(r#"{"type":"TOGGLE_SELECTION","dimension":"county","value":"x"}"#)
            .err()
            .unwrap()
            .to_string();
        assert!(err.contains("county"), "got {err}");
        assert!(!err.contains("untagged"), "got {err}");

        let err = IpcLine::parse(r#"{"type":"SET_FILTER"}"#).err().unwrap().to_string();
        assert!(err.contains("patch"), "got {err}");
    }
}
