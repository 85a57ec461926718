use crate::config;
use crate::events::AppEvent;
use crate::script::Command;
use async_channel::{Receiver, Sender};
use orbit::{MenuEvent, RadialMenu, Response};
use std::path::PathBuf;
use std::time::Instant;

const EVENT_BUFFER: usize = 64;

/// Owns the menu and feeds it commands, timer deadlines and finished loads.
pub struct Runtime {
    menu: RadialMenu,
    config_path: PathBuf,
    tx: Sender<AppEvent>,
    events: Receiver<MenuEvent>,
}

impl Runtime {
    pub fn new(menu: RadialMenu, config_path: PathBuf, tx: Sender<AppEvent>) -> Self {
        let (_, events) = menu.events().channel(EVENT_BUFFER);
        Self {
            menu,
            config_path,
            tx,
            events,
        }
    }

    pub async fn run(mut self, rx: Receiver<AppEvent>) {
        loop {
            let deadline = self.menu.next_deadline();
            let timer = async {
                match deadline {
                    Some(at) => tokio::time::sleep_until(at.into()).await,
                    None => std::future::pending::<()>().await,
                }
            };

            tokio::select! {
                event = rx.recv() => match event {
                    Ok(AppEvent::Quit) | Err(_) => break,
                    Ok(event) => self.handle(event),
                },
                _ = timer => {
                    let response = self.menu.tick(Instant::now());
                    self.drive(response);
                }
            }
            self.print_events();
        }
        self.print_events();
    }

    fn handle(&mut self, event: AppEvent) {
        let now = Instant::now();
        match event {
            AppEvent::Command(command) => {
                let response = apply(&mut self.menu, command, now);
                self.drive(response);
            }
            AppEvent::LoadFinished(outcome) => {
                let response = self.menu.finish_load(outcome, now);
                self.drive(response);
            }
            AppEvent::ConfigReload => self.reload(),
            AppEvent::Quit => {}
        }
    }

    fn reload(&mut self) {
        let app = match config::load_config(&self.config_path) {
            Ok(app) => app,
            Err(e) => {
                log::error!("Failed to reload config: {}", e);
                return;
            }
        };
        if let Err(e) = self.menu.set_config(app.menu_config()) {
            log::error!("Rejected reloaded config: {}", e);
            return;
        }
        self.menu
            .set_items(app.build_items(&config::base_dir(&self.config_path)));
        self.menu.set_viewport(app.viewport);
        log::info!("Config reloaded from {}", self.config_path.display());
    }

    fn drive(&self, response: Response) {
        if response.redraw {
            log::trace!("redraw requested");
        }
        if let Some(load) = response.load {
            let tx = self.tx.clone();
            tokio::spawn(async move {
                let outcome = load.run().await;
                let _ = tx.send(AppEvent::LoadFinished(outcome)).await;
            });
        }
    }

    fn print_events(&self) {
        while let Ok(event) = self.events.try_recv() {
            println!("{}", event);
        }
    }
}

pub fn apply(menu: &mut RadialMenu, command: Command, now: Instant) -> Response {
    match command {
        Command::Open(p) => menu.open(p),
        Command::Close => menu.close(),
        Command::Toggle(p) => menu.toggle(p),
        Command::Move(p) => menu.pointer_move(p, now),
        Command::Drag(p) => menu.update_hover_from_point(p, now),
        Command::Down(p) => menu.pointer_down(p, now),
        Command::Up(p) => menu.pointer_up(p, now),
        Command::Click(p) => menu.click(p, now),
        Command::Key(key) => menu.key(key),
        Command::Scroll(delta) => menu.scroll(delta),
        Command::DropTarget(p) => menu.open_as_drop_target(p, now),
        Command::Drop(payload) => menu.drop_on_hovered(payload),
        Command::CancelDrop => menu.cancel_drop(),
        Command::Back => menu.go_back(),
        Command::Root => menu.go_to_root(),
        Command::Viewport(viewport) => {
            menu.set_viewport(Some(viewport));
            Response::default()
        }
        Command::Wait(_) => Response::default(),
    }
}
