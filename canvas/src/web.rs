//! Browser host: wires DOM and WebSocket callbacks to the paint client.
//!
//! Everything runs on the page's single UI thread. The client is shared
//! between callbacks through `Rc<RefCell<..>>`; callbacks never nest, so a
//! borrow is never held across another callback. Closures are leaked with
//! `forget` because they live as long as the page.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::{JsCast, closure::Closure};
use web_sys::{CanvasRenderingContext2d, CloseEvent, Event, HtmlCanvasElement, MessageEvent, PointerEvent, WebSocket};

use crate::client::{RealtimePaintClient, Transport, TransportError};
use crate::consts::DEFAULT_ENDPOINT;
use crate::input::{Button, InputState, Point};
use crate::render::WebSurface;

type SharedClient = Rc<RefCell<RealtimePaintClient<WebSurface, WebTransport>>>;
type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

/// [`Transport`] over a browser `WebSocket`.
pub struct WebTransport {
    socket: WebSocket,
}

impl Transport for WebTransport {
    fn send_text(&mut self, text: &str) -> Result<(), TransportError> {
        if self.socket.ready_state() != WebSocket::OPEN {
            return Err(TransportError::Closed);
        }
        self.socket
            .send_with_str(text)
            .map_err(|err| TransportError::Send(format!("{err:?}")))
    }
}

/// Entry point called by the page once the module has loaded.
///
/// # Errors
///
/// Returns the `JsValue` of the first DOM or WebSocket call that fails
/// during startup.
#[wasm_bindgen]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Debug).map_err(|err| JsValue::from_str(&err.to_string()))?;

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window.document().ok_or_else(|| JsValue::from_str("no document"))?;
    let body = document.body().ok_or_else(|| JsValue::from_str("no body"))?;

    let canvas = document.create_element("canvas")?.dyn_into::<HtmlCanvasElement>()?;
    body.append_child(&canvas)?;
    let ctx = canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
        .dyn_into::<CanvasRenderingContext2d>()?;

    let width = css_px(window.inner_width()?.as_f64().unwrap_or(0.0));
    let height = css_px(window.inner_height()?.as_f64().unwrap_or(0.0));

    let socket = WebSocket::new(DEFAULT_ENDPOINT)?;
    let surface = WebSurface::new(canvas.clone(), ctx);
    let client: SharedClient =
        Rc::new(RefCell::new(RealtimePaintClient::new(surface, WebTransport { socket: socket.clone() })));
    client.borrow_mut().setup(width, height);

    wire_socket(&socket, &client);
    wire_pointer(&canvas, &client)?;
    start_frame_loop(&client)?;
    Ok(())
}

fn wire_socket(socket: &WebSocket, client: &SharedClient) {
    let on_open = {
        let client = Rc::clone(client);
        Closure::<dyn FnMut(Event)>::new(move |_: Event| {
            client.borrow_mut().on_open();
        })
    };
    socket.set_onopen(Some(on_open.as_ref().unchecked_ref()));
    on_open.forget();

    let on_message = {
        let client = Rc::clone(client);
        Closure::<dyn FnMut(MessageEvent)>::new(move |event: MessageEvent| {
            let Some(text) = event.data().as_string() else {
                log::debug!("ignoring non-text frame");
                return;
            };
            if let Err(err) = client.borrow_mut().on_message(&text) {
                log::warn!("dropping inbound frame: {err}");
            }
        })
    };
    socket.set_onmessage(Some(on_message.as_ref().unchecked_ref()));
    on_message.forget();

    let on_close = {
        let client = Rc::clone(client);
        Closure::<dyn FnMut(CloseEvent)>::new(move |_: CloseEvent| {
            client.borrow_mut().on_close();
        })
    };
    socket.set_onclose(Some(on_close.as_ref().unchecked_ref()));
    on_close.forget();
}

fn wire_pointer(canvas: &HtmlCanvasElement, client: &SharedClient) -> Result<(), JsValue> {
    let input = Rc::new(RefCell::new(InputState::default()));

    let on_down = {
        let input = Rc::clone(&input);
        let canvas = canvas.clone();
        Closure::<dyn FnMut(PointerEvent)>::new(move |ev: PointerEvent| {
            if let Err(err) = canvas.set_pointer_capture(ev.pointer_id()) {
                log::debug!("pointer capture failed: {err:?}");
            }
            if let Some(button) = Button::from_dom(ev.button()) {
                input.borrow_mut().on_pointer_down(button);
            }
        })
    };
    canvas.add_event_listener_with_callback("pointerdown", on_down.as_ref().unchecked_ref())?;
    on_down.forget();

    let on_move = {
        let input = Rc::clone(&input);
        let client = Rc::clone(client);
        Closure::<dyn FnMut(PointerEvent)>::new(move |ev: PointerEvent| {
            let Some(pt) = input.borrow_mut().on_pointer_move(pointer_point(&ev), primary_held(&ev)) else {
                return;
            };
            if let Err(err) = client.borrow_mut().mouse_dragged(pt.x, pt.y) {
                log::debug!("drag sample not sent: {err}");
            }
        })
    };
    canvas.add_event_listener_with_callback("pointermove", on_move.as_ref().unchecked_ref())?;
    on_move.forget();

    let on_up = {
        let input = Rc::clone(&input);
        Closure::<dyn FnMut(PointerEvent)>::new(move |ev: PointerEvent| {
            if let Some(button) = Button::from_dom(ev.button()) {
                input.borrow_mut().on_pointer_up(button);
            }
        })
    };
    canvas.add_event_listener_with_callback("pointerup", on_up.as_ref().unchecked_ref())?;
    on_up.forget();

    let on_cancel = {
        let input = Rc::clone(&input);
        Closure::<dyn FnMut(PointerEvent)>::new(move |_ev: PointerEvent| {
            input.borrow_mut().cancel();
        })
    };
    canvas.add_event_listener_with_callback("pointercancel", on_cancel.as_ref().unchecked_ref())?;
    on_cancel.forget();

    Ok(())
}

fn start_frame_loop(client: &SharedClient) -> Result<(), JsValue> {
    let frame: FrameCallback = Rc::new(RefCell::new(None));
    let frame_for_cb = Rc::clone(&frame);
    let client = Rc::clone(client);

    *frame.borrow_mut() = Some(Closure::wrap(Box::new(move |_ts: f64| {
        client.borrow_mut().draw();
        if let Some(cb) = frame_for_cb.borrow().as_ref() {
            if let Err(err) = request_frame(cb) {
                log::warn!("requestAnimationFrame failed: {err:?}");
            }
        }
    }) as Box<dyn FnMut(f64)>));

    if let Some(cb) = frame.borrow().as_ref() {
        request_frame(cb)?;
    }
    Ok(())
}

fn request_frame(cb: &Closure<dyn FnMut(f64)>) -> Result<i32, JsValue> {
    web_sys::window()
        .ok_or_else(|| JsValue::from_str("no window"))?
        .request_animation_frame(cb.as_ref().unchecked_ref())
}

fn pointer_point(ev: &PointerEvent) -> Point {
    Point::new(f64::from(ev.offset_x()), f64::from(ev.offset_y()))
}

/// Bit 0 of `MouseEvent.buttons` is the primary button.
fn primary_held(ev: &PointerEvent) -> bool {
    ev.buttons() & 1 != 0
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn css_px(value: f64) -> u32 {
    value.clamp(0.0, f64::from(u32::MAX)) as u32
}
