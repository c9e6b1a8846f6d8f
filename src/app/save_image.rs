use std::thread;

use winit::{event_loop::EventLoopProxy, window::Window};

use crate::{image_io::save::SaveFormat, util::UserEvent};

/// The dialog cannot report which filter was picked, so the format chosen in
/// the main window is listed first and travels with the picked path as the
/// extension hint.
pub fn open(name: String, chosen: SaveFormat, proxy: EventLoopProxy<UserEvent>, window: &Window) {
    let mut dialog = rfd::FileDialog::new()
        .set_title("Save Image")
        .set_file_name(name)
        .set_parent(window);

    for format in filter_order(chosen) {
        dialog = dialog.add_filter(format.name(), format.extensions());
    }

    thread::spawn(move || {
        if let Some(path) = dialog.save_file() {
            let _ = proxy.send_event(UserEvent::QueueSave(path, chosen));
        }
    });
}

fn filter_order(chosen: SaveFormat) -> Vec<SaveFormat> {
    let mut formats = vec![chosen];
    formats.extend(SaveFormat::ALL.into_iter().filter(|format| *format != chosen));
    formats
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chosen_format_is_listed_first() {
        for chosen in SaveFormat::ALL {
            let order = filter_order(chosen);
            assert_eq!(order[0], chosen);
            assert_eq!(order.len(), SaveFormat::ALL.len());
            assert!(SaveFormat::ALL.iter().all(|format| order.contains(format)));
        }
    }
}
