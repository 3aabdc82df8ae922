use iced::widget::image::Handle;
use iced::widget::{button, column, container, row, scrollable, text, Column, Image};
use iced::{Alignment, Element, Length, Task, Theme};
use iced_aw::Wrap;
use std::sync::Arc;

use photo_gallery::capture::picker::FilePickerCamera;
use photo_gallery::storage::files::DirFileStore;
use photo_gallery::storage::preferences::SqlitePreferences;
use photo_gallery::{GalleryConfig, GalleryStore, LoadSummary, PhotoRecord};

type Store = GalleryStore<FilePickerCamera, DirFileStore, SqlitePreferences>;

/// Edge length of a gallery tile
const TILE_SIZE: f32 = 160.0;

/// A photo ready to draw
#[derive(Debug, Clone)]
struct Tile {
    record: PhotoRecord,
    handle: Option<Handle>,
}

impl Tile {
    fn new(record: PhotoRecord) -> Self {
        let handle = match (record.display_bytes(), record.display_path()) {
            (Some(bytes), _) => Some(Handle::from_bytes(bytes)),
            (None, Some(path)) => Some(Handle::from_path(path)),
            (None, None) => None,
        };
        Tile { record, handle }
    }
}

/// Main application state
struct PhotoGallery {
    /// The gallery store (None if it could not be opened)
    store: Option<Arc<Store>>,
    /// Photos as last reported by the store, newest first
    tiles: Vec<Tile>,
    /// Position of the photo whose action sheet is open
    selected: Option<usize>,
    /// Status message to display to the user
    status: String,
    /// Loads, adds and deletes still running
    in_flight: usize,
}

/// Application messages (events)
#[derive(Debug, Clone)]
enum Message {
    /// Startup load finished
    Loaded(Result<(LoadSummary, Vec<PhotoRecord>), String>),
    /// User clicked "Take Photo"
    TakePhoto,
    /// Capture-and-add finished
    PhotoAdded(Result<Vec<PhotoRecord>, String>),
    /// User clicked a photo
    ShowActions(usize),
    /// User picked "Delete" in the action sheet
    Delete(usize),
    /// User dismissed the action sheet
    CancelActions,
    /// Delete finished; the photo list is current even when an error is reported
    PhotoDeleted(Vec<PhotoRecord>, Option<String>),
}

impl PhotoGallery {
    /// Create a new instance of the application
    fn new() -> (Self, Task<Message>) {
        match open_store() {
            Ok(store) => {
                let store = Arc::new(store);
                (
                    PhotoGallery {
                        store: Some(Arc::clone(&store)),
                        tiles: Vec::new(),
                        selected: None,
                        status: "Loading photos...".to_string(),
                        in_flight: 1,
                    },
                    Task::perform(load_gallery(store), Message::Loaded),
                )
            }
            Err(e) => {
                tracing::error!(error = %e, "gallery could not be opened");
                (
                    PhotoGallery {
                        store: None,
                        tiles: Vec::new(),
                        selected: None,
                        status: format!("Gallery unavailable: {}", e),
                        in_flight: 0,
                    },
                    Task::none(),
                )
            }
        }
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::Loaded(result) => {
                self.finish_task();
                match result {
                    Ok((summary, photos)) => {
                        self.status = if summary.skipped > 0 {
                            format!(
                                "{} photos. {} could not be found and were skipped.",
                                summary.restored, summary.skipped
                            )
                        } else {
                            format!("{} photos.", summary.restored)
                        };
                        self.set_photos(photos);
                    }
                    Err(e) => self.status = format!("Could not load photos: {}", e),
                }
                Task::none()
            }
            Message::TakePhoto => {
                let Some(store) = self.store.clone() else {
                    return Task::none();
                };
                self.in_flight += 1;
                self.selected = None;
                self.status = "Waiting for a photo...".to_string();
                Task::perform(add_photo(store), Message::PhotoAdded)
            }
            Message::PhotoAdded(result) => {
                self.finish_task();
                match result {
                    Ok(photos) => {
                        self.status = format!("Photo saved. {} photos.", photos.len());
                        self.set_photos(photos);
                    }
                    Err(e) => self.status = e,
                }
                Task::none()
            }
            Message::ShowActions(position) => {
                self.selected = Some(position);
                Task::none()
            }
            Message::CancelActions => {
                self.selected = None;
                Task::none()
            }
            Message::Delete(position) => {
                self.selected = None;
                let (Some(store), Some(tile)) = (self.store.clone(), self.tiles.get(position)) else {
                    return Task::none();
                };
                // Positions shift if an add lands first, names do not
                let name = tile.record.storage_name.clone();
                self.in_flight += 1;
                Task::perform(delete_photo(store, name), |(photos, error)| {
                    Message::PhotoDeleted(photos, error)
                })
            }
            Message::PhotoDeleted(photos, error) => {
                self.finish_task();
                self.status = match error {
                    Some(e) => e,
                    None => format!("Photo deleted. {} photos.", photos.len()),
                };
                self.set_photos(photos);
                Task::none()
            }
        }
    }

    /// Nothing is loading, adding or deleting
    fn idle(&self) -> bool {
        self.in_flight == 0
    }

    fn finish_task(&mut self) {
        self.in_flight = self.in_flight.saturating_sub(1);
    }

    fn set_photos(&mut self, photos: Vec<PhotoRecord>) {
        self.tiles = photos.into_iter().map(Tile::new).collect();
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        let take_photo = button("Take Photo")
            .padding(10)
            .on_press_maybe((self.idle() && self.store.is_some()).then_some(Message::TakePhoto));

        let header = row![text("Photo Gallery").size(32), take_photo]
            .spacing(20)
            .align_y(Alignment::Center);

        let tiles: Vec<Element<Message>> = self
            .tiles
            .iter()
            .enumerate()
            .map(|(position, tile)| tile_view(position, tile))
            .collect();

        let grid = scrollable(Wrap::with_elements(tiles).spacing(8.0).line_spacing(8.0))
            .height(Length::Fill);

        let mut content: Column<Message> = column![header, text(&self.status).size(16), grid]
            .spacing(20)
            .padding(20);

        if let Some(position) = self.selected {
            content = content.push(action_sheet(position));
        }

        container(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

/// One clickable photo tile
fn tile_view<'a>(position: usize, tile: &'a Tile) -> Element<'a, Message> {
    let face: Element<Message> = match &tile.handle {
        Some(handle) => Image::new(handle.clone())
            .width(Length::Fixed(TILE_SIZE))
            .height(Length::Fixed(TILE_SIZE))
            .into(),
        None => container(text(&tile.record.storage_name).size(12))
            .width(Length::Fixed(TILE_SIZE))
            .height(Length::Fixed(TILE_SIZE))
            .center_x(Length::Fixed(TILE_SIZE))
            .center_y(Length::Fixed(TILE_SIZE))
            .into(),
    };

    button(face)
        .padding(2)
        .style(button::text)
        .on_press(Message::ShowActions(position))
        .into()
}

/// Delete / Cancel choices for one photo
fn action_sheet<'a>(position: usize) -> Element<'a, Message> {
    container(
        column![
            text("Photos").size(18),
            button("Delete")
                .style(button::danger)
                .width(Length::Fill)
                .on_press(Message::Delete(position)),
            button("Cancel")
                .style(button::secondary)
                .width(Length::Fill)
                .on_press(Message::CancelActions),
        ]
        .spacing(8),
    )
    .padding(12)
    .width(Length::Fill)
    .style(container::rounded_box)
    .into()
}

fn main() -> iced::Result {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "photo_gallery=info".into()),
        )
        .init();

    iced::application("Photo Gallery", PhotoGallery::update, PhotoGallery::view)
        .theme(PhotoGallery::theme)
        .centered()
        .run_with(PhotoGallery::new)
}

/// Open the photo directory and preferences database from configuration
fn open_store() -> photo_gallery::Result<Store> {
    let config = GalleryConfig::from_env()?;
    let files = DirFileStore::open(config.photos_dir())?;
    let preferences = SqlitePreferences::open(config.preferences_path())?;

    tracing::info!(data_dir = %config.data_dir.display(), "gallery opened");
    Ok(GalleryStore::new(&config, FilePickerCamera::new(), files, preferences))
}

async fn load_gallery(store: Arc<Store>) -> Result<(LoadSummary, Vec<PhotoRecord>), String> {
    let summary = store.load().await.map_err(|e| e.to_string())?;
    Ok((summary, store.photos().await))
}

async fn add_photo(store: Arc<Store>) -> Result<Vec<PhotoRecord>, String> {
    store.add_new_to_gallery().await.map_err(|e| e.to_string())?;
    Ok(store.photos().await)
}

/// A failed delete may still have removed the photo, so the list is always returned
async fn delete_photo(store: Arc<Store>, name: String) -> (Vec<PhotoRecord>, Option<String>) {
    let error = store.delete_named(&name).await.err().map(|e| e.to_string());
    (store.photos().await, error)
}
