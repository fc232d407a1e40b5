//! `resonance`: plan a timeline and lock it into a production project

use anyhow::{bail, Context};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use resonance_project::{
    frames_per_beat, read_project, ExecutionEdit, PacingCurve, PlatformContext, ProductionConfig,
    Project, ProjectCommand, ProjectStateMachine, ProjectStore, VisualIntensity,
};
use resonance_timeline::{
    catalog, plan, render_timeline, Phase1Plan, Platform, TargetDuration, TimelineRequest,
    DEFAULT_DURATION_SECONDS, DEFAULT_STRUCTURE_ID,
};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    init_logging();

    let matches = cli().get_matches();
    match matches.subcommand() {
        Some(("structures", _)) => {
            list_structures();
            Ok(())
        }
        Some(("plan", args)) => run_plan(args),
        Some(("lock", args)) => run_lock(args),
        Some(("inspect", args)) => run_inspect(args),
        _ => {
            cli().print_help()?;
            Ok(())
        }
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn config_arg() -> Arg {
    Arg::new("config")
        .long("config")
        .short('c')
        .help("Production configuration (TOML)")
}

fn planning_args() -> [Arg; 5] {
    [
        Arg::new("duration")
            .long("duration")
            .short('d')
            .value_parser(value_parser!(i64))
            .allow_negative_numbers(true)
            .help("Target duration in seconds, clamped to 5-180 [default: 60]"),
        Arg::new("structure")
            .long("structure")
            .short('s')
            .default_value(DEFAULT_STRUCTURE_ID)
            .help("Emotional structure id"),
        Arg::new("platform")
            .long("platform")
            .short('p')
            .default_value("TikTok")
            .value_parser(value_parser!(Platform))
            .help("Distribution platform"),
        Arg::new("dialogue")
            .long("dialogue")
            .action(ArgAction::SetTrue)
            .help("Content carries speech"),
        Arg::new("strict")
            .long("strict")
            .action(ArgAction::SetTrue)
            .help("Reject out-of-range durations and unknown structures instead of adjusting them"),
    ]
}

fn cli() -> Command {
    Command::new("resonance")
        .version(resonance_timeline::VERSION)
        .about("Timeline synthesis and production planning for short-form video")
        .subcommand(Command::new("structures").about("List the emotional structures"))
        .subcommand(
            Command::new("plan")
                .about("Compute a timeline, its conflicts and its quality score")
                .args(planning_args())
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Output as JSON"),
                ),
        )
        .subcommand(
            Command::new("lock")
                .about("Lock a blueprint, apply execution edits and print the project document")
                .args(planning_args())
                .arg(config_arg())
                .arg(
                    Arg::new("intensity")
                        .long("intensity")
                        .action(ArgAction::Append)
                        .value_parser(parse_intensity)
                        .help("Visual intensity edit, IDX=LOW|MED|HIGH"),
                )
                .arg(
                    Arg::new("pacing")
                        .long("pacing")
                        .action(ArgAction::Append)
                        .value_parser(parse_pacing)
                        .help("Pacing curve edit, IDX=STATIC|LINEAR_ACCEL|EXP_DECEL"),
                )
                .arg(
                    Arg::new("bpm")
                        .long("bpm")
                        .value_parser(value_parser!(u32))
                        .help("Audio grid in beats per minute"),
                )
                .arg(
                    Arg::new("ducking")
                        .long("ducking")
                        .action(ArgAction::SetTrue)
                        .help("Duck music under dialogue"),
                ),
        )
        .subcommand(
            Command::new("inspect")
                .about("Load a saved project document and report its state and validation")
                .arg(Arg::new("file").required(true).help("Project document (JSON)"))
                .arg(config_arg()),
        )
}

fn parse_indexed<T>(raw: &str) -> Result<(usize, T), String>
where
    T: std::str::FromStr<Err = String>,
{
    let (index, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected IDX=VALUE, got {raw}"))?;
    let index = index
        .trim()
        .parse::<usize>()
        .map_err(|e| format!("bad segment index {index}: {e}"))?;
    Ok((index, value.trim().parse()?))
}

fn parse_intensity(raw: &str) -> Result<(usize, VisualIntensity), String> {
    parse_indexed(raw)
}

fn parse_pacing(raw: &str) -> Result<(usize, PacingCurve), String> {
    parse_indexed(raw)
}

fn request_from(args: &ArgMatches) -> resonance_timeline::Result<TimelineRequest> {
    let seconds = args
        .get_one::<i64>("duration")
        .copied()
        .unwrap_or(i64::from(DEFAULT_DURATION_SECONDS));
    let structure = args
        .get_one::<String>("structure")
        .map_or(DEFAULT_STRUCTURE_ID, String::as_str);
    let platform = args
        .get_one::<Platform>("platform")
        .copied()
        .unwrap_or(Platform::TikTok);

    let request = if args.get_flag("strict") {
        TimelineRequest::strict(seconds, structure, platform)?
    } else {
        TimelineRequest::new(TargetDuration::clamped(seconds), structure, platform)
    };
    Ok(request.with_dialogue(args.get_flag("dialogue")))
}

fn load_config(args: &ArgMatches) -> resonance_project::Result<ProductionConfig> {
    match args.get_one::<String>("config") {
        Some(path) => Ok(ProductionConfig::load(path)?),
        None => Ok(ProductionConfig::default()),
    }
}

fn list_structures() {
    for template in catalog().all() {
        let shape: Vec<String> = template
            .segments
            .iter()
            .map(|s| format!("{} {}%", s.segment_type, s.base_percentage))
            .collect();
        println!("{:<8} {}", template.id, template.description);
        println!("         {}", shape.join(" / "));
    }
}

fn print_plan(plan: &Phase1Plan) {
    println!(
        "{} | {} | {} | dialogue: {}",
        plan.structure.name,
        plan.request.duration,
        plan.request.platform,
        if plan.request.has_dialogue { "yes" } else { "no" }
    );
    print!("{}", render_timeline(&plan.timeline));

    if plan.conflicts.is_empty() {
        println!("Conflicts: none");
    } else {
        println!("Conflicts:");
        for conflict in &plan.conflicts {
            println!("  [{:?}] {}: {}", conflict.severity, conflict.code, conflict.message);
            println!("      fix: {}", conflict.fix);
        }
    }

    println!("Quality: {}/100", plan.quality.total_score);
    for line in &plan.quality.feedback {
        println!("  - {line}");
    }
}

fn run_plan(args: &ArgMatches) -> anyhow::Result<()> {
    let plan = plan(&request_from(args)?);
    if args.get_flag("json") {
        println!("{}", serde_json::to_string_pretty(&plan)?);
    } else {
        print_plan(&plan);
    }
    Ok(())
}

fn execution_edits(args: &ArgMatches) -> Vec<ExecutionEdit> {
    let mut edits = Vec::new();
    if let Some(bpm) = args.get_one::<u32>("bpm") {
        edits.push(ExecutionEdit::SetBpm(*bpm));
    }
    if args.get_flag("ducking") {
        edits.push(ExecutionEdit::SetDuckingEnabled(true));
    }
    if let Some(values) = args.get_many::<(usize, VisualIntensity)>("intensity") {
        edits.extend(
            values.map(|&(index, intensity)| ExecutionEdit::SetSegmentIntensity { index, intensity }),
        );
    }
    if let Some(values) = args.get_many::<(usize, PacingCurve)>("pacing") {
        edits.extend(values.map(|&(index, curve)| ExecutionEdit::SetSegmentPacing { index, curve }));
    }
    edits
}

/// Lock `plan` into a fresh store and apply `edits` in order
fn lock_project(
    config: ProductionConfig,
    plan: &Phase1Plan,
    edits: Vec<ExecutionEdit>,
) -> resonance_project::Result<ProjectStore> {
    let store = ProjectStore::new(ProjectStateMachine::new(config));
    store.dispatch_checked(ProjectCommand::LockBlueprint {
        phase1: plan.to_phase1_data(),
        platform_context: PlatformContext::for_plan(plan),
    })?;
    for edit in edits {
        tracing::debug!(?edit, "applying execution edit");
        store.dispatch_checked(ProjectCommand::UpdateExecution(edit))?;
    }
    Ok(store)
}

fn report_audio_grid(project: &Project, fps: u32) {
    if let Some(execution) = project.execution() {
        let bpm = execution.audio_plan.bpm;
        tracing::info!(
            bpm,
            fps,
            frames_per_beat = frames_per_beat(bpm, fps),
            "audio grid"
        );
    }
}

fn run_lock(args: &ArgMatches) -> anyhow::Result<()> {
    let config = load_config(args).context("loading production config")?;
    let fps = config.frame_rate;

    let plan = plan(&request_from(args)?);
    if plan.is_blocked() {
        let reasons: Vec<&str> = plan
            .conflicts
            .iter()
            .filter(|c| c.is_blocking())
            .map(|c| c.message.as_str())
            .collect();
        bail!("cannot lock a blocked plan: {}", reasons.join("; "));
    }

    let store = lock_project(config, &plan, execution_edits(args))?;
    let project = store.snapshot();
    report_audio_grid(&project, fps);

    println!("{}", store.save()?);
    tracing::info!(state = ?project.state(), "project document written");
    Ok(())
}

fn run_inspect(args: &ArgMatches) -> anyhow::Result<()> {
    let config = load_config(args).context("loading production config")?;
    let fps = config.frame_rate;
    let path = args
        .get_one::<String>("file")
        .context("missing project file")?;

    let project = read_project(path, &ProjectStateMachine::new(config))
        .with_context(|| format!("loading project from {path}"))?;
    print_project(&project, fps);
    Ok(())
}

fn print_project(project: &Project, fps: u32) {
    println!("State: {:?}", project.state());
    if let Some(plan) = project.plan() {
        let blueprint = plan.blueprint();
        let audio = &plan.execution().audio_plan;
        println!(
            "Blueprint {} | {} | {}s",
            blueprint.id(),
            plan.platform_context().platform_id,
            plan.platform_context().max_duration
        );
        print!("{}", render_timeline(&blueprint.phase1_data().timeline));
        println!(
            "Audio: {} BPM, {:.2} frames per beat at {fps}fps",
            audio.bpm,
            frames_per_beat(audio.bpm, fps)
        );
        println!("Validation: {:?}", plan.validation().global_status);
        for signal in &plan.validation().signals {
            println!("  [{:?}] {}: {}", signal.result, signal.check_name, signal.message);
        }
    }
    if let Some(outcome) = project.outcome() {
        println!(
            "Outcome: {}% 3s retention, confidence {}/5",
            outcome.retention_3s, outcome.user_confidence
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_is_well_formed() {
        cli().debug_assert();
    }

    #[test]
    fn indexed_values() {
        assert_eq!(parse_intensity("2=high").unwrap(), (2, VisualIntensity::High));
        assert_eq!(parse_pacing("0=exp_decel").unwrap(), (0, PacingCurve::ExpDecel));
        assert!(parse_intensity("high").is_err());
        assert!(parse_intensity("x=high").is_err());
    }

    #[test]
    fn request_is_clamped() {
        let matches = cli().get_matches_from(["resonance", "plan", "--duration", "900", "-p", "youtube shorts"]);
        let (_, args) = matches.subcommand().unwrap();
        let request = request_from(args).unwrap();
        assert_eq!(request.duration.seconds(), 180);
        assert_eq!(request.platform, Platform::YouTubeShorts);
    }

    #[test]
    fn strict_request_is_rejected() {
        let matches = cli().get_matches_from(["resonance", "plan", "--duration", "900", "--strict"]);
        let (_, args) = matches.subcommand().unwrap();
        assert!(request_from(args).is_err());
    }

    #[test]
    fn lock_applies_edits_in_order() {
        let matches = cli().get_matches_from([
            "resonance", "lock", "-d", "30", "-s", "climb", "--bpm", "96", "--intensity", "1=high",
        ]);
        let (_, args) = matches.subcommand().unwrap();
        let plan = plan(&request_from(args).unwrap());

        let store = lock_project(ProductionConfig::default(), &plan, execution_edits(args)).unwrap();
        let project = store.snapshot();
        let execution = project.execution().unwrap();
        assert_eq!(execution.audio_plan.bpm, 96);
        assert_eq!(execution.visual_density[1].intensity, VisualIntensity::High);
    }

    #[test]
    fn rejected_edit_surfaces_state_machine_error() {
        let plan = plan(&request_from(&plan_args()).unwrap());
        let edits = vec![ExecutionEdit::SetSegmentIntensity {
            index: 99,
            intensity: VisualIntensity::Low,
        }];
        assert!(matches!(
            lock_project(ProductionConfig::default(), &plan, edits),
            Err(resonance_project::ProjectError::StateMachine(_))
        ));
    }

    #[test]
    fn missing_config_surfaces_config_error() {
        let matches = cli().get_matches_from(["resonance", "lock", "-c", "/nonexistent/resonance.toml"]);
        let (_, args) = matches.subcommand().unwrap();
        assert!(matches!(
            load_config(args),
            Err(resonance_project::ProjectError::Config(_))
        ));
    }

    fn plan_args() -> ArgMatches {
        let matches = cli().get_matches_from(["resonance", "plan"]);
        matches.subcommand_matches("plan").unwrap().clone()
    }
}
