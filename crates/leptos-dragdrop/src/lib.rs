//! Leptos DragDrop Utilities
//!
//! HTML5 drag-and-drop between columns for Leptos.
//! Items are dragged by id; columns are drop targets keyed by any `Copy` value.

use leptos::prelude::*;
use wasm_bindgen::JsCast;

/// How long clicks are swallowed after a drag ends
const CLICK_GUARD_MS: i32 = 100;

/// DnD state signals
pub struct DndSignals<I: Send + Sync + 'static, C: Send + Sync + 'static> {
    pub dragging_id_read: ReadSignal<Option<I>>,
    pub dragging_id_write: WriteSignal<Option<I>>,
    /// Column currently under the pointer
    pub over_read: ReadSignal<Option<C>>,
    pub over_write: WriteSignal<Option<C>>,
    pub drag_just_ended_read: ReadSignal<bool>,
    pub drag_just_ended_write: WriteSignal<bool>,
}

impl<I: Send + Sync + 'static, C: Send + Sync + 'static> Clone for DndSignals<I, C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<I: Send + Sync + 'static, C: Send + Sync + 'static> Copy for DndSignals<I, C> {}

pub fn create_dnd_signals<I, C>() -> DndSignals<I, C>
where
    I: Send + Sync + 'static,
    C: Send + Sync + 'static,
{
    let (dragging_id_read, dragging_id_write) = signal(None::<I>);
    let (over_read, over_write) = signal(None::<C>);
    let (drag_just_ended_read, drag_just_ended_write) = signal(false);
    DndSignals {
        dragging_id_read,
        dragging_id_write,
        over_read,
        over_write,
        drag_just_ended_read,
        drag_just_ended_write,
    }
}

impl<I, C> DndSignals<I, C>
where
    I: Clone + Send + Sync + 'static,
    C: Copy + PartialEq + Send + Sync + 'static,
{
    /// Tracked: is this column the hovered drop target
    pub fn is_over(&self, column: C) -> bool {
        self.over_read.get() == Some(column)
    }

    /// Tracked: is anything being dragged
    pub fn is_dragging(&self) -> bool {
        self.dragging_id_read.with(Option::is_some)
    }
}

/// End drag operation
pub fn end_drag<I, C>(dnd: &DndSignals<I, C>)
where
    I: Send + Sync + 'static,
    C: Send + Sync + 'static,
{
    dnd.dragging_id_write.set(None);
    dnd.over_write.set(None);
    dnd.drag_just_ended_write.set(true);

    if let Some(win) = web_sys::window() {
        let clear = dnd.drag_just_ended_write;
        let cb = wasm_bindgen::closure::Closure::<dyn FnMut()>::new(move || {
            clear.set(false);
        });
        let _ = win.set_timeout_with_callback_and_timeout_and_arguments_0(cb.as_ref().unchecked_ref(), CLICK_GUARD_MS);
        cb.forget();
    }
}

/// `dragstart` handler for a draggable item
pub fn make_on_dragstart<I, C>(dnd: DndSignals<I, C>, item_id: I) -> impl Fn(web_sys::DragEvent) + Clone + 'static
where
    I: Clone + ToString + Send + Sync + 'static,
    C: Send + Sync + 'static,
{
    move |ev: web_sys::DragEvent| {
        if let Some(data) = ev.data_transfer() {
            // Firefox refuses to start a drag without payload
            let _ = data.set_data("text/plain", &item_id.to_string());
            data.set_effect_allowed("move");
        }
        dnd.over_write.set(None);
        dnd.dragging_id_write.set(Some(item_id.clone()));
    }
}

/// `dragover` handler for a column; marks it as a valid target
pub fn make_on_dragover<I, C>(dnd: DndSignals<I, C>, column: C) -> impl Fn(web_sys::DragEvent) + Copy + 'static
where
    I: Send + Sync + 'static,
    C: Copy + PartialEq + Send + Sync + 'static,
{
    move |ev: web_sys::DragEvent| {
        if dnd.dragging_id_read.with_untracked(Option::is_none) {
            return;
        }
        ev.prevent_default();
        if let Some(data) = ev.data_transfer() {
            data.set_drop_effect("move");
        }
        if dnd.over_read.get_untracked() != Some(column) {
            dnd.over_write.set(Some(column));
        }
    }
}

/// `dragleave` handler for a column
pub fn make_on_dragleave<I, C>(dnd: DndSignals<I, C>, column: C) -> impl Fn(web_sys::DragEvent) + Copy + 'static
where
    I: Send + Sync + 'static,
    C: Copy + PartialEq + Send + Sync + 'static,
{
    move |_ev: web_sys::DragEvent| {
        if dnd.over_read.get_untracked() == Some(column) {
            dnd.over_write.set(None);
        }
    }
}

/// `drop` handler for a column; hands `(item, column)` to the callback
pub fn make_on_drop<I, C>(
    dnd: DndSignals<I, C>,
    column: C,
    on_drop: Callback<(I, C)>,
) -> impl Fn(web_sys::DragEvent) + Copy + 'static
where
    I: Clone + Send + Sync + 'static,
    C: Copy + Send + Sync + 'static,
{
    move |ev: web_sys::DragEvent| {
        ev.prevent_default();
        let dragged = dnd.dragging_id_read.get_untracked();
        end_drag(&dnd);
        if let Some(id) = dragged {
            on_drop.run((id, column));
        }
    }
}

/// `dragend` handler for a draggable item; fires after `drop` or on cancel
pub fn make_on_dragend<I, C>(dnd: DndSignals<I, C>, on_cancel: Option<Callback<()>>) -> impl Fn(web_sys::DragEvent) + Copy + 'static
where
    I: Send + Sync + 'static,
    C: Send + Sync + 'static,
{
    move |_ev: web_sys::DragEvent| {
        // Still set means no column accepted the drop
        if dnd.dragging_id_read.with_untracked(Option::is_some) {
            end_drag(&dnd);
            if let Some(cancel) = on_cancel {
                cancel.run(());
            }
        }
    }
}
