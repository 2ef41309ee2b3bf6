/// Storm image viewer — reversed grey-scale heat map with km axes

use egui_plot::{GridInput, GridMark, Plot, PlotImage, PlotPoint};
use std::path::PathBuf;

use crate::data::item::{Item, ItemId};
use crate::data::npy::{self, StormImage};
use crate::data::render;
use crate::session::label::StormLabel;

/// Cached image and texture for the item under the cursor
#[derive(Default)]
pub struct ViewerState {
    pub loaded_path: Option<PathBuf>,
    pub loaded_for: Option<ItemId>,
    pub image: Option<StormImage>,
    pub texture: Option<egui::TextureHandle>,
    pub load_error: Option<String>,
    pub show_grid: bool,
}

impl ViewerState {
    /// Cache is keyed on the file, ids can repeat across directories
    pub fn needs_reload(&self, item: &Item) -> bool {
        self.loaded_path.as_deref() != Some(item.path.as_path())
    }

    /// Load `item` unless it is already the cached one
    pub fn ensure_loaded(&mut self, ctx: &egui::Context, item: &Item) {
        if !self.needs_reload(item) {
            return;
        }
        self.loaded_path = Some(item.path.clone());
        self.loaded_for = Some(item.id);
        self.texture = None;
        match npy::read_npy_file(&item.path) {
            Ok(image) => {
                let rgba = render::render_greys_r(&image);
                let color_image = egui::ColorImage::from_rgba_unmultiplied(
                    [rgba.width() as usize, rgba.height() as usize],
                    rgba.as_raw(),
                );
                self.texture =
                    Some(ctx.load_texture("storm_image", color_image, egui::TextureOptions::NEAREST));
                self.image = Some(image);
                self.load_error = None;
            }
            Err(e) => {
                log::error!("Failed to load {}: {}", item.path.display(), e);
                self.image = None;
                self.load_error = Some(e.to_string());
            }
        }
    }
}

/// Plot title: identifier plus current selection
pub fn title_lines(id: &ItemId, label: Option<StormLabel>) -> (String, String) {
    (
        format!("Storm ID {}", id),
        format!(
            "Selected: {}",
            label.map(|l| l.label()).unwrap_or("None")
        ),
    )
}

/// Five evenly spaced tick positions from 0 to `extent`
pub fn quarter_ticks(extent: f64) -> [f64; 5] {
    let step = extent / 4.0;
    [0.0, step, 2.0 * step, 3.0 * step, extent]
}

/// Axis label text for a pixel position
pub fn km_label(pixels: f64, km_per_pixel: f64) -> String {
    format!("{}", (pixels * km_per_pixel).round())
}

fn quarter_marks(extent: f64) -> impl Fn(GridInput) -> Vec<GridMark> {
    move |_input| {
        quarter_ticks(extent)
            .iter()
            .map(|&value| GridMark {
                value,
                step_size: extent / 4.0,
            })
            .collect()
    }
}

pub fn show_viewer(
    ui: &mut egui::Ui,
    state: &ViewerState,
    id: &ItemId,
    label: Option<StormLabel>,
    km_per_pixel: f64,
) {
    let (title, selected) = title_lines(id, label);
    ui.vertical_centered(|ui| {
        ui.heading(title);
        ui.label(egui::RichText::new(selected).strong());
    });
    ui.add_space(4.0);

    if let Some(err) = &state.load_error {
        ui.centered_and_justified(|ui| {
            ui.colored_label(egui::Color32::from_rgb(0xD0, 0x30, 0x30), err);
        });
        return;
    }

    let (Some(texture), Some(image)) = (&state.texture, &state.image) else {
        ui.centered_and_justified(|ui| {
            ui.label("Loading…");
        });
        return;
    };

    let width = image.cols as f64;
    let height = image.rows as f64;
    let km = km_per_pixel;

    Plot::new("storm_plot")
        .height(ui.available_height() - 4.0)
        .data_aspect(1.0)
        .include_x(0.0)
        .include_x(width)
        .include_y(0.0)
        .include_y(height)
        .x_axis_label("W-E (km)")
        .y_axis_label("S-N (km)")
        .x_grid_spacer(quarter_marks(width))
        .y_grid_spacer(quarter_marks(height))
        .x_axis_formatter(move |mark, _range| km_label(mark.value, km))
        .y_axis_formatter(move |mark, _range| km_label(mark.value, km))
        .show_grid([state.show_grid, state.show_grid])
        .allow_drag(true)
        .allow_zoom(true)
        .allow_scroll(true)
        .show(ui, |plot_ui| {
            plot_ui.image(PlotImage::new(
                texture.id(),
                PlotPoint::new(width / 2.0, height / 2.0),
                egui::vec2(width as f32, height as f32),
            ));
        });
}
