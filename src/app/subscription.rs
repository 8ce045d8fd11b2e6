// SPDX-License-Identifier: MPL-2.0
//! Event subscriptions for the application.

use super::Message;
use crate::config::VIEWFINDER_REFRESH_MS;
use iced::{event, time, Subscription};
use std::time::Duration;

/// Routes window close requests and file drops.
pub fn create_event_subscription() -> Subscription<Message> {
    event::listen_with(|event, _status, window_id| match event {
        event::Event::Window(iced::window::Event::CloseRequested) => {
            Some(Message::WindowCloseRequested(window_id))
        }
        event::Event::Window(iced::window::Event::FileDropped(path)) => {
            Some(Message::FileDropped(path))
        }
        _ => None,
    })
}

/// Refreshes the viewfinder while the camera is open.
pub fn create_viewfinder_subscription(camera_open: bool) -> Subscription<Message> {
    if camera_open {
        time::every(Duration::from_millis(VIEWFINDER_REFRESH_MS)).map(Message::ViewfinderTick)
    } else {
        Subscription::none()
    }
}
