use crate::ArtflowApp;
use crate::tools::ToolKind;

fn tool_label(tool: ToolKind) -> &'static str {
    match tool {
        ToolKind::Pen => "✏ Pen",
        ToolKind::Eraser => "⌫ Eraser",
        ToolKind::Fill => "▨ Fill",
        ToolKind::Line => "╱ Line",
        ToolKind::Rectangle => "▭ Rectangle",
        ToolKind::Circle => "◯ Circle",
    }
}

pub fn tools_panel(app: &mut ArtflowApp, ctx: &egui::Context) {
    egui::SidePanel::left("tools_panel")
        .resizable(false)
        .default_width(180.0)
        .show(ctx, |ui| {
            ui.heading("Tools");

            let active = app.engine().tool();
            for tool in ToolKind::ALL {
                if ui.selectable_label(active == tool, tool_label(tool)).clicked() {
                    log::info!("Tool selected from UI: {tool}");
                    let selected = app.engine_mut().select_tool(tool);
                    app.report(selected);
                }
            }
            ui.separator();

            ui.horizontal(|ui| {
                ui.label("Color:");
                let mut color = app.engine().color();
                if egui::color_picker::color_edit_button_srgba(
                    ui,
                    &mut color,
                    egui::color_picker::Alpha::Opaque,
                )
                .changed()
                {
                    app.engine_mut().set_color32(color);
                }
            });

            ui.horizontal(|ui| {
                ui.label("Width:");
                let mut width = app.engine().line_width();
                if ui.add(egui::Slider::new(&mut width, 1..=50)).changed() {
                    let set = app.engine_mut().set_line_width(width);
                    app.report(set);
                }
            });
            ui.separator();

            ui.horizontal(|ui| {
                let can_undo = app.engine().can_undo();
                let can_redo = app.engine().can_redo();

                if ui.add_enabled(can_undo, egui::Button::new("Undo")).clicked() {
                    app.undo();
                }
                if ui.add_enabled(can_redo, egui::Button::new("Redo")).clicked() {
                    app.redo();
                }
                if ui.button("Clear").clicked() {
                    let cleared = app.engine_mut().clear();
                    app.report(cleared);
                }
            });

            let history = app.engine().history();
            ui.label(format!(
                "History: {} / {} (redo {})",
                history.undo_depth(),
                history.capacity(),
                history.redo_depth()
            ));
            ui.separator();

            if ui.button("Submit drawing").clicked() {
                app.submit(ctx);
            }
            if ui.button("New drawing").clicked() {
                app.new_round();
            }

            if let Some(status) = app.status() {
                ui.separator();
                ui.small(status);
            }
        });
}
