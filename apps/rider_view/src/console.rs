//! Interactive console: reads commands from stdin, drives the view
//! controller, and prints what the view and the map report.

use std::sync::Arc;

use map_display::{MapEvent, RecordingMapDisplay};
use tokio::{
    io::{self, AsyncBufReadExt, BufReader},
    sync::broadcast::{self, error::RecvError},
    task::JoinHandle,
};
use tracker_core::{ViewController, ViewEvent};

use crate::commands::{parse_command, ConsoleCommand, ParseError, HELP};

pub async fn run(controller: &mut ViewController) -> anyhow::Result<()> {
    println!("{HELP}");
    let mut lines = BufReader::new(io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        match parse_command(&line) {
            Ok(cmd) => {
                if !dispatch(controller, cmd).await {
                    break;
                }
            }
            Err(ParseError::Empty) => {}
            Err(err) => println!("{err}"),
        }
    }
    Ok(())
}

/// Applies one command. Returns `false` when the console should exit.
pub async fn dispatch(controller: &mut ViewController, cmd: ConsoleCommand) -> bool {
    let cmd_name = match &cmd {
        ConsoleCommand::SetAddress(_) => "set_address",
        ConsoleCommand::SubmitAddress => "submit_address",
        ConsoleCommand::TrackRider => "track_rider",
        ConsoleCommand::Status => "status",
        ConsoleCommand::Help => "help",
        ConsoleCommand::Quit => "quit",
    };
    tracing::debug!(command = cmd_name, "console command");

    // Failures are already logged and broadcast by the controller.
    match cmd {
        ConsoleCommand::SetAddress(text) => controller.set_address(text),
        ConsoleCommand::SubmitAddress => {
            let _ = controller.submit_address().await;
        }
        ConsoleCommand::TrackRider => {
            let _ = controller.track_rider().await;
        }
        ConsoleCommand::Status => print_status(controller),
        ConsoleCommand::Help => println!("{HELP}"),
        ConsoleCommand::Quit => return false,
    }
    true
}

fn print_status(controller: &ViewController) {
    let state = controller.state();
    println!("address : {:?}", state.address);
    match &state.geocode {
        Some(geocode) => println!(
            "geocoded: {} {}",
            geocode.origin,
            geocode.address.as_deref().unwrap_or("")
        ),
        None => println!("geocoded: -"),
    }
    match state.rider {
        Some(rider) => println!("rider   : {rider}"),
        None => println!("rider   : -"),
    }
    match &state.path {
        Some(path) => println!("path    : {} points", path.len()),
        None => println!("path    : -"),
    }
    match controller.animation_state() {
        Some(animation) => println!("animation: {animation:?}"),
        None => println!("animation: idle"),
    }
}

pub fn describe_view_event(event: &ViewEvent) -> String {
    match event {
        ViewEvent::MapReady { map } => format!("map #{} ready", map.0),
        ViewEvent::Geocoded(result) => format!(
            "geocoded {} -> {}",
            result.address.as_deref().unwrap_or("address"),
            result.origin
        ),
        ViewEvent::RiderPlaced(rider) => format!("rider placed at {rider}"),
        ViewEvent::PathComputed { points, start, end } => match (start, end) {
            (Some(start), Some(end)) => format!("path of {points} points {start} -> {end}"),
            _ => format!("path of {points} points"),
        },
        ViewEvent::AnimationStarted { map, steps } => {
            format!("rider moving on map #{} ({steps} steps)", map.0)
        }
        ViewEvent::Error(report) => format!("error ({:?}): {}", report.kind, report.message),
    }
}

pub fn describe_map_event(event: &MapEvent) -> Option<String> {
    match event {
        MapEvent::MarkerAdded {
            map,
            marker,
            position,
        } => Some(format!("  map #{} marker #{} at {position}", map.0, marker.0)),
        _ => None,
    }
}

/// Prints view and map events until both channels close.
pub fn spawn_printer(
    mut view_events: broadcast::Receiver<ViewEvent>,
    display: Arc<RecordingMapDisplay>,
) -> JoinHandle<()> {
    let mut map_events = display.subscribe_events();
    tokio::spawn(async move {
        let mut view_open = true;
        let mut map_open = true;
        while view_open || map_open {
            tokio::select! {
                event = view_events.recv(), if view_open => match event {
                    Ok(event) => println!("{}", describe_view_event(&event)),
                    Err(RecvError::Lagged(n)) => tracing::warn!(skipped = n, "view events lagged"),
                    Err(RecvError::Closed) => view_open = false,
                },
                event = map_events.recv(), if map_open => match event {
                    Ok(event) => {
                        if let Some(line) = describe_map_event(&event) {
                            println!("{line}");
                        }
                    }
                    Err(RecvError::Lagged(n)) => tracing::warn!(skipped = n, "map events lagged"),
                    Err(RecvError::Closed) => map_open = false,
                },
            }
        }
    })
}
