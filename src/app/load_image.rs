use std::thread;

use winit::{event_loop::EventLoopProxy, window::Window};

use crate::util::{UserEvent, extensions::OPEN};

pub fn open(proxy: EventLoopProxy<UserEvent>, window: &Window) {
    let mut extensions: Vec<&str> = OPEN.iter().copied().collect();
    extensions.sort_unstable();

    let dialog = rfd::FileDialog::new()
        .set_title("Open Image")
        .set_parent(window)
        .add_filter("Image Files", extensions.as_slice());

    thread::spawn(move || {
        if let Some(path) = dialog.pick_file() {
            let _ = proxy.send_event(UserEvent::QueueLoad(path));
        }
    });
}
