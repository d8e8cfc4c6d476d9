//! Key event handling

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::model::InputMode;
use super::AppController;

impl AppController {
    pub async fn handle_key_event(&self, key: KeyEvent) -> Result<()> {
        if key.kind != KeyEventKind::Press {
            return Ok(());
        }

        let model = self.model.lock().await;

        // Error notification blocks all other interactions
        if model.has_error().await {
            return match key.code {
                KeyCode::Esc | KeyCode::Enter => {
                    drop(model);
                    self.dismiss_error().await;
                    Ok(())
                }
                _ => Ok(()),
            };
        }

        if model.is_help_popup_open().await {
            return match key.code {
                KeyCode::Esc | KeyCode::Char('h') | KeyCode::Char('H') => {
                    model.hide_help_popup().await;
                    Ok(())
                }
                _ => Ok(()),
            };
        }

        // Topic input captures every key
        if model.input_mode().await == InputMode::Topic {
            match key.code {
                KeyCode::Enter => {
                    let topic = model.take_topic().await;
                    drop(model);
                    if let Some(topic) = topic {
                        let controller = self.clone();
                        tokio::spawn(async move {
                            controller.generate_podcast(topic).await;
                        });
                    }
                }
                KeyCode::Esc => model.cancel_topic_input().await,
                KeyCode::Backspace => model.backspace_topic().await,
                KeyCode::Char(c) => {
                    if (c == 'c' || c == 'C') && key.modifiers.contains(KeyModifiers::CONTROL) {
                        model.cancel_topic_input().await;
                    } else {
                        model.append_to_topic(c).await;
                    }
                }
                _ => {}
            }
            return Ok(());
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                model.set_should_quit(true).await;
            }
            KeyCode::Up => {
                model.move_selection_up().await;
            }
            KeyCode::Down => {
                model.move_selection_down().await;
            }
            // Downloads run in the background; a later selection supersedes this one
            KeyCode::Enter => {
                drop(model);
                let controller = self.clone();
                tokio::spawn(async move {
                    controller.play_selected().await;
                });
            }
            KeyCode::Char(' ') => {
                drop(model);
                self.toggle_playback().await;
            }
            KeyCode::Left => {
                drop(model);
                self.seek_backward().await;
            }
            KeyCode::Right => {
                drop(model);
                self.seek_forward().await;
            }
            KeyCode::Char('c') | KeyCode::Char('C') => {
                drop(model);
                self.toggle_captions().await;
            }
            KeyCode::Char('r') | KeyCode::Char('R') => {
                drop(model);
                let controller = self.clone();
                tokio::spawn(async move {
                    controller.refresh_podcasts().await;
                });
            }
            KeyCode::Char('/') => {
                model.begin_topic_input().await;
            }
            KeyCode::Char('h') | KeyCode::Char('H') => {
                model.toggle_help_popup().await;
            }
            _ => {}
        }
        Ok(())
    }
}
