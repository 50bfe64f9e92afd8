//! A scripted docking session: build a layout, drag a tab out, pin a tool
//! window, then save and restore the arrangement.
//!
//! Run with `cargo run --example docking_session`; set `RUST_LOG` to
//! override the default `dockhand=debug` filter.

use std::time::{Duration, Instant};

use dockhand::{
    DockEvent, DockListener, DockWidgetFeatures, DockZone, DockingSystem, DropOutcome,
    PerspectiveStore, PressTarget, SideBarLocation, Vec2,
};

struct PrintListener;

impl DockListener for PrintListener {
    fn on_event(&mut self, event: &DockEvent) {
        match event {
            DockEvent::VisibilityChanged { widget, visible } => {
                println!("  {} is now {}", widget, if *visible { "visible" } else { "hidden" });
            }
            DockEvent::TopLevelChanged { widget, floating } => {
                println!("  {} {}", widget, if *floating { "floats" } else { "docked" });
            }
            _ => {}
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    if std::env::var_os("RUST_LOG").is_some() {
        dockhand_core::logging::init();
    } else {
        dockhand_core::logging::init_with_filter("dockhand=debug");
    }
    dockhand_core::profiling::set_enabled(true);

    let mut docking = DockingSystem::default();
    docking.add_listener(PrintListener);

    let editor = docking.register_widget("editor", DockWidgetFeatures::DEFAULT)?;
    let console = docking.register_widget("console", DockWidgetFeatures::DEFAULT)?;
    let outline = docking.register_widget("outline", DockWidgetFeatures::DEFAULT)?;
    let problems = docking.register_widget("problems", DockWidgetFeatures::DEFAULT)?;

    println!("Building layout");
    let main = docking.add_widget(editor, DockZone::Center, None, None)?;
    docking.add_widget(console, DockZone::Center, Some(main), None)?;
    docking.add_widget(outline, DockZone::Right, Some(main), None)?;
    docking.add_widget(problems, DockZone::Bottom, None, None)?;
    let mut perspectives = PerspectiveStore::new();
    perspectives.save("default", &docking, 0);

    println!("Dragging the console tab out of the editor area");
    let (_, tab) = docking
        .tab_rects(main)
        .into_iter()
        .find(|(widget, _)| *widget == console)
        .ok_or("console tab not drawn")?;
    let start = tab.center();
    docking.press(PressTarget::Tab(console), start)?;
    docking.pointer_moved(start + Vec2::new(0.0, 120.0));
    docking.pointer_moved(Vec2::new(600.0, 400.0));
    match docking.release(Vec2::new(600.0, 400.0)) {
        DropOutcome::Floated(floating) => println!("Console now floats in {}", floating),
        other => println!("Drop ended with {:?}", other),
    }

    println!("Pinning problems to the bottom side bar");
    let pinned = docking.pin_widget(problems, Some(SideBarLocation::Bottom))?;
    let now = Instant::now();
    docking.side_tab_hover_started(pinned, now);
    if docking.tick(now + Duration::from_millis(600)) == Some(pinned) {
        println!("Hovering expanded {}", pinned);
    }

    dockhand_core::profiling::new_frame();
    let json = docking.save_json(0)?;
    println!("Saved layout ({} bytes)", json.len());

    println!("Back to the default perspective");
    perspectives.open("default", &mut docking, 0)?;
    println!(
        "{} areas, {} floating windows",
        docking.areas().count(),
        docking.floating_containers().count()
    );

    println!("Restoring the saved layout");
    docking.restore_json(&json, 0)?;
    println!(
        "{} areas, {} floating windows",
        docking.areas().count(),
        docking.floating_containers().count()
    );
    Ok(())
}
