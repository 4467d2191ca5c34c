//! Browser frontend: canvas events and the animation loop

use std::cell::RefCell;
use std::rc::Rc;

use particulate_simulation::Tool;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, ImageData, MouseEvent, Window};

use crate::config::ParticulateConfig;
use crate::input::{CanvasGeometry, tool_for_buttons};
use crate::sandbox::Sandbox;

/// Id of the canvas element the page must provide
const CANVAS_ID: &str = "canvas";

#[wasm_bindgen]
extern "C" {
    /// Brush size slider exposed by the host page
    #[wasm_bindgen(js_namespace = window, catch)]
    fn get_brush_size() -> Result<u32, JsValue>;
}

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    // Set up panic hook for better error messages in the browser console
    console_error_panic_hook::set_once();

    console_log::init_with_level(log::Level::Info)
        .map_err(|e| JsValue::from_str(&format!("Failed to initialize logger: {}", e)))?;

    let config = ParticulateConfig::default();
    let sandbox = Sandbox::new(&config)
        .map_err(|e| JsValue::from_str(&format!("Failed to create sandbox: {}", e)))?;
    let sandbox = Rc::new(RefCell::new(sandbox));

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no global window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("window has no document"))?;
    let canvas: HtmlCanvasElement = document
        .get_element_by_id(CANVAS_ID)
        .ok_or_else(|| JsValue::from_str("missing <canvas id=\"canvas\">"))?
        .dyn_into()?;

    {
        let sandbox = sandbox.borrow();
        canvas.set_width(sandbox.frame().width() as u32);
        canvas.set_height(sandbox.frame().height() as u32);
    }

    let context: CanvasRenderingContext2d = canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
        .dyn_into()?;

    register_pointer_events(&canvas, &sandbox, config.brush.default_size)?;
    start_animation_loop(window, context, sandbox)?;

    log::info!("Particulate WASM module initialized");
    Ok(())
}

fn register_pointer_events(
    canvas: &HtmlCanvasElement,
    sandbox: &Rc<RefCell<Sandbox>>,
    default_brush: u32,
) -> Result<(), JsValue> {
    {
        let canvas_ref = canvas.clone();
        let sandbox = Rc::clone(sandbox);
        let on_down = Closure::<dyn FnMut(MouseEvent)>::new(move |event: MouseEvent| {
            if let Some((cell, brush, tool)) = stroke_at(&canvas_ref, &event, &sandbox, default_brush) {
                sandbox.borrow_mut().pointer_down(cell, brush, tool);
            }
        });
        canvas.add_event_listener_with_callback("mousedown", on_down.as_ref().unchecked_ref())?;
        on_down.forget();
    }
    {
        let canvas_ref = canvas.clone();
        let sandbox = Rc::clone(sandbox);
        let on_move = Closure::<dyn FnMut(MouseEvent)>::new(move |event: MouseEvent| {
            if !sandbox.borrow().is_pointer_down() {
                return;
            }
            if let Some((cell, brush, tool)) = stroke_at(&canvas_ref, &event, &sandbox, default_brush) {
                sandbox.borrow_mut().pointer_move(cell, brush, tool);
            }
        });
        canvas.add_event_listener_with_callback("mousemove", on_move.as_ref().unchecked_ref())?;
        on_move.forget();
    }
    {
        let sandbox = Rc::clone(sandbox);
        let on_release = Closure::<dyn FnMut(MouseEvent)>::new(move |event: MouseEvent| {
            if event.type_() == "mouseleave" {
                sandbox.borrow_mut().pointer_leave();
            } else {
                sandbox.borrow_mut().pointer_up();
            }
        });
        canvas.add_event_listener_with_callback("mouseup", on_release.as_ref().unchecked_ref())?;
        canvas
            .add_event_listener_with_callback("mouseleave", on_release.as_ref().unchecked_ref())?;
        on_release.forget();
    }
    {
        // Right-drag erases, so keep the context menu out of the way
        let on_menu = Closure::<dyn FnMut(web_sys::Event)>::new(|event: web_sys::Event| {
            event.prevent_default();
        });
        canvas.add_event_listener_with_callback("contextmenu", on_menu.as_ref().unchecked_ref())?;
        on_menu.forget();
    }
    Ok(())
}

/// Resolve the cell, brush and tool for a mouse event
fn stroke_at(
    canvas: &HtmlCanvasElement,
    event: &MouseEvent,
    sandbox: &Rc<RefCell<Sandbox>>,
    default_brush: u32,
) -> Option<((i32, i32), u32, Tool)> {
    let rect = canvas.get_bounding_client_rect();
    let geometry = CanvasGeometry {
        canvas_width: f64::from(canvas.width()),
        canvas_height: f64::from(canvas.height()),
        left: rect.left(),
        top: rect.top(),
        rect_width: rect.width(),
        rect_height: rect.height(),
    };
    let cell_size = sandbox.borrow().cell_size();
    let cell = geometry.locate(
        f64::from(event.client_x()),
        f64::from(event.client_y()),
        cell_size,
    )?;
    let brush = get_brush_size().unwrap_or(default_brush);
    let tool = tool_for_buttons(i32::from(event.button()), i32::from(event.buttons()));
    Some((cell, brush, tool))
}

fn start_animation_loop(
    window: Window,
    context: CanvasRenderingContext2d,
    sandbox: Rc<RefCell<Sandbox>>,
) -> Result<(), JsValue> {
    let next: FrameCallback = Rc::new(RefCell::new(None));
    let first = Rc::clone(&next);
    let loop_window = window.clone();

    *first.borrow_mut() = Some(Closure::<dyn FnMut()>::new(move || {
        sandbox.borrow_mut().tick();
        if let Err(e) = present(&context, &sandbox.borrow()) {
            log::error!("Render error: {:?}", e);
        }
        if let Some(callback) = next.borrow().as_ref() {
            if let Err(e) = request_frame(&loop_window, callback) {
                log::error!("Failed to schedule frame: {:?}", e);
            }
        }
    }));

    if let Some(callback) = first.borrow().as_ref() {
        request_frame(&window, callback)?;
    }
    Ok(())
}

fn request_frame(window: &Window, callback: &Closure<dyn FnMut()>) -> Result<i32, JsValue> {
    window.request_animation_frame(callback.as_ref().unchecked_ref())
}

/// Copy the frame onto the canvas
///
/// Linear memory may be shared (atomics build), and `ImageData` refuses
/// shared views, so the pixels are copied into a fresh JS array first.
fn present(context: &CanvasRenderingContext2d, sandbox: &Sandbox) -> Result<(), JsValue> {
    let frame = sandbox.frame();
    let data = js_sys::Uint8ClampedArray::new_with_length(frame.pixels().len() as u32);
    data.copy_from(frame.pixels());
    let image = ImageData::new_with_js_u8_clamped_array_and_sh(
        &data,
        frame.width() as u32,
        frame.height() as u32,
    )?;
    context.put_image_data(&image, 0.0, 0.0)
}

