use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use iced::widget::image::Handle;
use iced::widget::{
    button, canvas, column, container, opaque, row, scrollable, stack, text, text_input,
};
use iced::{Alignment, Color, Element, Length, Subscription, Task, Theme};
use iced_aw::Wrap;

mod assets;
mod error;
mod state;
mod ui;

use assets::manifest::{self, CodeMap, ManifestEntry};
use assets::probe::{FsImageProbe, ImageProbe};
use assets::{ingest, resolver};
use error::GalleryError;
use state::card::{CardCollection, CardRecord};
use state::tilt::{TiltRegistry, RESET_DELAY_MS};
use state::unlock::UnlockGate;
use state::viewer::{self as viewer_state, GalleryImage, Viewer, ViewerCommand, ViewerState};
use ui::card::{CardEvent, CardVisual};
use ui::viewer::ViewerCanvas;

/// Card dimensions in the grid, pixels.
const CARD_WIDTH: f32 = 240.0;
const CARD_HEIGHT: f32 = 320.0;

/// Main application state
struct CardGallery {
    /// Directory media paths resolve against (parent of the assets root).
    site_root: PathBuf,
    /// When set, cards with a `codes_txt/<name>.txt` marker unlock on load.
    auto_unlock: bool,
    cards: CardCollection,
    codes: CodeMap,
    tilt: TiltRegistry,
    gate: UnlockGate,
    viewer: Viewer,
    probe: Arc<dyn ImageProbe>,
    /// Card whose gallery modal is open, if any.
    active_card: Option<String>,
    /// Images ingested into the open gallery.
    gallery: Vec<GalleryImage>,
    search: String,
    /// Rejection message shown inside the unlock prompt.
    unlock_error: String,
    /// Banner shown when the manifest could not be loaded.
    error_banner: String,
    /// Status line at the bottom of the grid.
    status: String,
}

/// Application messages (events)
#[derive(Debug, Clone)]
enum Message {
    /// Manifest fetch finished.
    ManifestLoaded(Result<Vec<ManifestEntry>, GalleryError>),
    /// Code-map fetch finished.
    CodesLoaded(Result<CodeMap, GalleryError>),
    /// A card's preview probe chain finished.
    PreviewResolved { card_id: String, url: Option<String> },
    /// Auto-unlock marker check finished for a card.
    AutoUnlockChecked { card_id: String, found: bool },
    /// Pointer activity over a card.
    Card(String, CardEvent),
    /// The tilt decay delay elapsed for a card.
    TiltResetDue { card_id: String, token: u64 },
    TogglePreview(String),
    SearchChanged(String),
    UnlockInput(String),
    UnlockSubmit,
    UnlockCancel,
    CloseModal,
    /// User asked for the native image picker.
    PickImages,
    /// Picker or drop ingestion finished.
    ImagesAdded(Vec<GalleryImage>),
    /// A file was dropped on the window.
    FileDropped(PathBuf),
    /// A gallery thumbnail was clicked.
    OpenViewer(usize),
    Viewer(ViewerCommand),
    ViewerWheel(f32),
    ViewerPanStart(f32, f32),
    ViewerPanMoved(f32, f32),
    ViewerPanEnd,
}

impl CardGallery {
    /// Create a new instance and kick off the manifest and code-map loads.
    fn new() -> (Self, Task<Message>) {
        let args: Vec<String> = std::env::args().skip(1).collect();
        let assets_root = args
            .iter()
            .find(|a| !a.starts_with("--"))
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("assets"));
        let auto_unlock = args.iter().any(|a| a == "--auto-unlock");

        println!(
            "🃏 Card Gallery starting (assets root: {})",
            assets_root.display()
        );

        // Manifest paths like "assets/models/x.jpg" are relative to the
        // directory containing the assets root.
        let site_root = assets_root
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        let app = CardGallery {
            site_root: site_root.clone(),
            auto_unlock,
            cards: CardCollection::default(),
            codes: CodeMap::new(),
            tilt: TiltRegistry::default(),
            gate: UnlockGate::default(),
            viewer: Viewer::default(),
            probe: Arc::new(FsImageProbe::new(site_root)),
            active_card: None,
            gallery: Vec::new(),
            search: String::new(),
            unlock_error: String::new(),
            error_banner: String::new(),
            status: "Loading manifest...".to_string(),
        };

        let load = Task::batch([
            Task::perform(
                manifest::load_manifest(assets_root.clone()),
                Message::ManifestLoaded,
            ),
            Task::perform(manifest::load_codes(assets_root), Message::CodesLoaded),
        ]);

        (app, load)
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::ManifestLoaded(Ok(entries)) => {
                self.error_banner.clear();
                self.cards = CardCollection::from_manifest(entries);
                let cards = &self.cards;
                self.tilt.retain_cards(|id| cards.contains(id));
                self.status = format!("Ready. {} cards loaded.", self.cards.len());
                println!("✅ {} cards loaded", self.cards.len());

                self.spawn_card_tasks()
            }
            Message::ManifestLoaded(Err(e)) => {
                eprintln!("❌ {}", e);
                self.error_banner = e.to_string();
                self.cards = CardCollection::placeholder();
                self.status = "Showing placeholder content.".to_string();
                Task::none()
            }

            Message::CodesLoaded(Ok(map)) => {
                println!("🔑 {} unlock codes loaded", map.len());
                self.codes = map;
                Task::none()
            }
            Message::CodesLoaded(Err(e)) => {
                // Non-fatal: unlocking simply fails until a reload succeeds.
                eprintln!("⚠️  {}", e);
                Task::none()
            }

            Message::PreviewResolved { card_id, url } => {
                match self.cards.get_mut(&card_id) {
                    Some(card) => match url {
                        Some(url) => {
                            println!("✅ [preview] {} → {}", card.name, url);
                            card.set_preview(url);
                        }
                        None => println!("🚫 [preview] none found for {}", card.name),
                    },
                    // The probe outlived its card (manifest reload); discard.
                    None => {}
                }
                Task::none()
            }

            Message::AutoUnlockChecked { card_id, found } => {
                if found {
                    if let Some(card) = self.cards.get_mut(&card_id) {
                        println!("🔓 auto-unlocked {}", card.name);
                        card.unlocked = true;
                    }
                }
                Task::none()
            }

            Message::Card(card_id, event) => self.handle_card_event(card_id, event),

            Message::TiltResetDue { card_id, token } => {
                self.tilt.state_mut(&card_id).apply_reset(token);
                Task::none()
            }

            Message::TogglePreview(card_id) => {
                if let Some(card) = self.cards.get_mut(&card_id) {
                    card.toggle_preview();
                }
                Task::none()
            }

            Message::SearchChanged(query) => {
                self.search = query;
                Task::none()
            }

            Message::UnlockInput(value) => {
                self.gate.set_input(value);
                Task::none()
            }
            Message::UnlockSubmit => {
                match self.gate.submit(&self.codes, &mut self.cards) {
                    Ok(Some(card_id)) => {
                        self.unlock_error.clear();
                        self.open_gallery(&card_id);
                    }
                    // Blank input: keep the prompt open, no error.
                    Ok(None) => {}
                    Err(e) => self.unlock_error = e.to_string(),
                }
                Task::none()
            }
            Message::UnlockCancel => {
                self.gate.cancel();
                self.unlock_error.clear();
                Task::none()
            }

            Message::CloseModal => {
                self.active_card = None;
                self.gallery.clear();
                // Cards re-layout under the modal; snap them all to center.
                self.tilt.reset_all();
                Task::none()
            }

            Message::PickImages => Task::perform(ingest::pick_images(), Message::ImagesAdded),
            Message::ImagesAdded(images) => {
                if !images.is_empty() {
                    println!("🖼️  {} image(s) added to the gallery", images.len());
                }
                self.gallery.extend(images);
                Task::none()
            }
            Message::FileDropped(path) => {
                // Drops only land in an open gallery.
                if self.active_card.is_none() {
                    return Task::none();
                }
                Task::perform(
                    async move { ingest::ingest_file(path).await.into_iter().collect() },
                    Message::ImagesAdded,
                )
            }

            Message::OpenViewer(index) => {
                self.viewer.open(self.gallery.clone(), index);
                Task::none()
            }
            Message::Viewer(command) => {
                self.viewer.apply(command);
                Task::none()
            }
            Message::ViewerWheel(delta_y) => {
                self.viewer.apply(viewer_state::wheel_command(delta_y));
                Task::none()
            }
            Message::ViewerPanStart(x, y) => {
                self.viewer.start_pan(x, y);
                Task::none()
            }
            Message::ViewerPanMoved(x, y) => {
                self.viewer.pan_moved(x, y);
                Task::none()
            }
            Message::ViewerPanEnd => {
                self.viewer.end_pan();
                Task::none()
            }
        }
    }

    /// One probe chain per card with a preview candidate, plus the optional
    /// auto-unlock marker checks. Chains run concurrently across cards;
    /// within one card the probing is strictly sequential.
    fn spawn_card_tasks(&self) -> Task<Message> {
        let mut tasks = Vec::new();

        for card in self.cards.iter() {
            if card.preview_candidate.is_empty() {
                continue;
            }
            let candidates = resolver::resolve_candidates(&card.preview_candidate);
            let probe = self.probe.clone();
            let card_id = card.id.clone();
            tasks.push(Task::perform(
                resolver::resolve(candidates, probe),
                move |url| Message::PreviewResolved {
                    card_id: card_id.clone(),
                    url,
                },
            ));
        }

        if self.auto_unlock {
            for card in self.cards.iter() {
                let card_id = card.id.clone();
                let marker = self.site_root.join(format!("codes_txt/{}.txt", card.name));
                tasks.push(Task::perform(
                    async move { tokio::fs::try_exists(&marker).await.unwrap_or(false) },
                    move |found| Message::AutoUnlockChecked {
                        card_id: card_id.clone(),
                        found,
                    },
                ));
            }
        }

        Task::batch(tasks)
    }

    fn handle_card_event(&mut self, card_id: String, event: CardEvent) -> Task<Message> {
        match event {
            CardEvent::Entered => {
                self.tilt.state_mut(&card_id).pointer_entered();
                Task::none()
            }
            CardEvent::Moved {
                raw_x,
                raw_y,
                origin_x,
                origin_y,
                width,
                height,
            } => {
                self.tilt
                    .state_mut(&card_id)
                    .pointer_moved(raw_x, raw_y, origin_x, origin_y, width, height);
                Task::none()
            }
            CardEvent::Left => {
                let token = self.tilt.state_mut(&card_id).pointer_left();
                Task::perform(
                    tokio::time::sleep(Duration::from_millis(RESET_DELAY_MS)),
                    move |_| Message::TiltResetDue {
                        card_id: card_id.clone(),
                        token,
                    },
                )
            }
            CardEvent::Clicked => {
                match self.cards.get(&card_id).map(|c| c.unlocked) {
                    Some(true) => self.open_gallery(&card_id),
                    Some(false) => {
                        self.unlock_error.clear();
                        self.gate.open(&card_id);
                    }
                    None => {}
                }
                Task::none()
            }
        }
    }

    /// Open the gallery modal for a card. The gallery starts empty and is
    /// filled through the picker or drag-drop.
    fn open_gallery(&mut self, card_id: &str) {
        self.active_card = Some(card_id.to_string());
        self.gallery.clear();
    }

    /// Keyboard only while the viewer is open; file drops always.
    fn subscription(&self) -> Subscription<Message> {
        let drops = iced::event::listen_with(|event, _status, _window| match event {
            iced::Event::Window(iced::window::Event::FileDropped(path)) => {
                Some(Message::FileDropped(path))
            }
            _ => None,
        });

        if self.viewer.is_open() {
            let keys = iced::keyboard::on_key_press(|key, _modifiers| {
                ui::viewer::key_command(&key).map(Message::Viewer)
            });
            Subscription::batch([drops, keys])
        } else {
            drops
        }
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        if let Some(viewer) = self.viewer.state() {
            return self.viewer_view(viewer);
        }
        if self.active_card.is_some() {
            return self.gallery_view();
        }
        self.grid_view()
    }

    /// The card grid with search, error banner and status line.
    fn grid_view(&self) -> Element<Message> {
        let cards: Vec<Element<Message>> = self
            .cards
            .filtered(&self.search)
            .map(|card| self.card_view(card))
            .collect();
        let grid = Wrap::with_elements(cards).spacing(20.0).line_spacing(20.0);

        let mut page = column![
            text("Card Gallery").size(40),
            text_input("Search cards...", &self.search)
                .on_input(Message::SearchChanged)
                .padding(10)
                .width(Length::Fixed(300.0)),
        ]
        .spacing(20)
        .padding(30)
        .align_x(Alignment::Center);

        if !self.error_banner.is_empty() {
            page = page.push(
                text(&self.error_banner)
                    .size(16)
                    .color(Color::from_rgb(0.9, 0.3, 0.3)),
            );
        }

        page = page.push(
            scrollable(container(grid).width(Length::Fill).center_x(Length::Fill))
                .height(Length::Fill),
        );
        page = page.push(text(&self.status).size(14));

        let base: Element<Message> = container(page)
            .width(Length::Fill)
            .height(Length::Fill)
            .into();

        // The unlock prompt overlays the grid and swallows events below it.
        if self.gate.is_open() {
            stack![base, opaque(self.unlock_prompt())].into()
        } else {
            base
        }
    }

    /// One card: tilted background canvas, info block, lock/play overlays.
    fn card_view<'a>(&self, card: &'a CardRecord) -> Element<'a, Message> {
        let background = canvas(CardVisual {
            card_id: card.id.clone(),
            handle: Handle::from_path(self.media_path(card.display_image())),
            transform: self.tilt.transform(&card.id),
            locked: !card.unlocked,
        })
        .width(Length::Fixed(CARD_WIDTH))
        .height(Length::Fixed(CARD_HEIGHT));

        let mut info = column![text(&card.name).size(20)].spacing(4).padding(12);
        if !card.scene.is_empty() {
            info = info.push(text(&card.scene).size(14));
        }
        info = info.push(text(format!("{} photos · {} videos", card.photos, card.videos)).size(12));

        let mut overlay = column![].spacing(6).align_x(Alignment::Center);
        if !card.unlocked {
            overlay = overlay.push(text("🔒").size(32));
        }
        if card.has_preview() {
            let label = if card.showing_preview { "⏹ Stop" } else { "▶ Play" };
            overlay = overlay.push(
                button(text(label).size(14))
                    .on_press(Message::TogglePreview(card.id.clone()))
                    .padding(6),
            );
        }

        stack![
            background,
            container(info)
                .width(Length::Fill)
                .height(Length::Fill)
                .align_y(iced::alignment::Vertical::Bottom),
            container(overlay)
                .width(Length::Fill)
                .height(Length::Fill)
                .center_x(Length::Fill)
                .center_y(Length::Fill),
        ]
        .width(Length::Fixed(CARD_WIDTH))
        .height(Length::Fixed(CARD_HEIGHT))
        .into()
    }

    /// The open card's gallery: ingested thumbnails + picker button.
    fn gallery_view(&self) -> Element<Message> {
        let name = self
            .active_card
            .as_deref()
            .and_then(|id| self.cards.get(id))
            .map(|c| c.name.as_str())
            .unwrap_or("Gallery");

        let thumbnails: Vec<Element<Message>> = self
            .gallery
            .iter()
            .enumerate()
            .map(|(index, image)| {
                button(
                    iced::widget::image(Handle::from_path(&image.path))
                        .width(Length::Fixed(140.0))
                        .height(Length::Fixed(140.0)),
                )
                .on_press(Message::OpenViewer(index))
                .padding(2)
                .into()
            })
            .collect();

        let grid: Element<Message> = if thumbnails.is_empty() {
            text("No images yet. Add some, or drop files on the window.")
                .size(16)
                .into()
        } else {
            Wrap::with_elements(thumbnails)
                .spacing(10.0)
                .line_spacing(10.0)
                .into()
        };

        container(
            column![
                row![
                    text(name).size(28).width(Length::Fill),
                    button("Add Images").on_press(Message::PickImages).padding(8),
                    button("Close").on_press(Message::CloseModal).padding(8),
                ]
                .spacing(10)
                .align_y(Alignment::Center),
                scrollable(container(grid).width(Length::Fill).center_x(Length::Fill))
                    .height(Length::Fill),
                text(format!("{} images", self.gallery.len())).size(14),
            ]
            .spacing(20)
            .padding(30),
        )
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
    }

    /// The full-screen viewer: zoom/pan canvas plus navigation controls.
    fn viewer_view<'a>(&self, viewer: &'a ViewerState) -> Element<'a, Message> {
        let image = viewer.current();

        let canvas_el = canvas(ViewerCanvas {
            handle: Handle::from_path(&image.path),
            image_size: (image.width, image.height),
            zoom: viewer.zoom(),
            pan: viewer.pan(),
        })
        .width(Length::Fill)
        .height(Length::Fill);

        let controls = row![
            button("‹").on_press(Message::Viewer(ViewerCommand::Prev)).padding(8),
            text(format!("{} / {}", viewer.index() + 1, viewer.image_count())).size(16),
            button("›").on_press(Message::Viewer(ViewerCommand::Next)).padding(8),
            button("−").on_press(Message::Viewer(ViewerCommand::ZoomOut)).padding(8),
            text(format!("{:.0}%", viewer.zoom() * 100.0)).size(16),
            button("+").on_press(Message::Viewer(ViewerCommand::ZoomIn)).padding(8),
            button("Reset").on_press(Message::Viewer(ViewerCommand::ResetZoom)).padding(8),
            button("✕").on_press(Message::Viewer(ViewerCommand::Close)).padding(8),
        ]
        .spacing(10)
        .align_y(Alignment::Center);

        container(column![
            canvas_el,
            row![text(&image.name).size(14).width(Length::Fill), controls]
                .padding(10)
                .align_y(Alignment::Center),
        ])
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
    }

    /// The modal unlock prompt, centered over a dimmed backdrop.
    fn unlock_prompt(&self) -> Element<Message> {
        let name = self
            .gate
            .staged_card()
            .and_then(|id| self.cards.get(id))
            .map(|c| c.name.as_str())
            .unwrap_or("this card");

        let mut prompt = column![
            text(format!("Enter the code for {}", name)).size(18),
            text_input("Code", self.gate.input())
                .on_input(Message::UnlockInput)
                .on_submit(Message::UnlockSubmit)
                .padding(10)
                .width(Length::Fixed(260.0)),
            row![
                button("Unlock").on_press(Message::UnlockSubmit).padding(8),
                button("Cancel").on_press(Message::UnlockCancel).padding(8),
            ]
            .spacing(10),
        ]
        .spacing(14)
        .align_x(Alignment::Center);

        if !self.unlock_error.is_empty() {
            prompt = prompt.push(
                text(&self.unlock_error)
                    .size(14)
                    .color(Color::from_rgb(0.9, 0.3, 0.3)),
            );
        }

        container(container(prompt).padding(24).style(container::rounded_box))
            .width(Length::Fill)
            .height(Length::Fill)
            .center_x(Length::Fill)
            .center_y(Length::Fill)
            .style(|_theme| container::Style {
                background: Some(Color::from_rgba(0.0, 0.0, 0.0, 0.6).into()),
                ..container::Style::default()
            })
            .into()
    }

    /// Map a card's display path to a real filesystem path. Display paths
    /// are already on-disk relative paths (the probe matched resolved
    /// previews by their literal names), so they join without decoding.
    fn media_path(&self, path: &str) -> PathBuf {
        self.site_root.join(path)
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

fn main() -> iced::Result {
    iced::application("Card Gallery", CardGallery::update, CardGallery::view)
        .subscription(CardGallery::subscription)
        .theme(CardGallery::theme)
        .centered()
        .run_with(CardGallery::new)
}
