use approx::assert_relative_eq;
use glam::DVec2;
use map_layer_engine::app::PointerEventClass;
use map_layer_engine::{
    EngineOptions, HandlerRegistry, InputModel, MapController, MapEvent, MapStore, MemorySurface,
    PointerInput, RenderSurface, ViewState,
};

fn touch_controller(store: &mut MapStore) -> MapController {
    MapController::new(
        &EngineOptions::default(),
        HandlerRegistry::new(),
        store,
        InputModel::Touch,
    )
}

fn surface() -> MemorySurface {
    let mut surface = MemorySurface::with_viewport(DVec2::new(1000.0, 800.0));
    surface.set_view(ViewState::new(15.0, DVec2::new(1_280_000.0, 6_130_000.0)));
    surface
}

fn touch_start(x: f64, y: f64, time_ms: u64) -> PointerInput {
    PointerInput::TouchStart {
        pointer_id: 7,
        screen: DVec2::new(x, y),
        time_ms,
    }
}

fn touch_end(x: f64, y: f64, time_ms: u64) -> PointerInput {
    PointerInput::TouchEnd {
        pointer_id: 7,
        screen: DVec2::new(x, y),
        time_ms,
    }
}

#[test]
fn test_tap_emits_click_to_subscribers() {
    let mut store = MapStore::new();
    let mut controller = touch_controller(&mut store);
    let events = controller.subscribe_events();
    let surface = surface();

    controller.handle_pointer(touch_start(500.0, 400.0, 10), &surface);
    controller.handle_pointer(touch_end(502.0, 401.0, 180), &surface);

    let received: Vec<MapEvent> = events.try_iter().collect();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].class(), PointerEventClass::Click);
    let expected = surface
        .coordinate_from_pixel(DVec2::new(500.0, 400.0))
        .expect("Koordinate erwartet");
    assert_relative_eq!(received[0].coordinate().x, expected.x);
    assert_relative_eq!(received[0].coordinate().y, expected.y);
}

#[test]
fn test_long_press_emits_context_click_on_tick() {
    let mut store = MapStore::new();
    let mut controller = touch_controller(&mut store);
    let surface = surface();

    controller.handle_pointer(touch_start(100.0, 100.0, 0), &surface);
    assert!(controller.tick(250, &surface).is_empty());

    let events = controller.tick(500, &surface);
    assert_eq!(events.len(), 1);
    assert!(matches!(events[0], MapEvent::ContextClick { .. }));

    assert!(controller
        .handle_pointer(touch_end(100.0, 100.0, 650), &surface)
        .is_empty());
}

#[test]
fn test_drag_emits_nothing() {
    let mut store = MapStore::new();
    let mut controller = touch_controller(&mut store);
    let events = controller.subscribe_events();
    let surface = surface();

    controller.handle_pointer(touch_start(100.0, 100.0, 0), &surface);
    controller.handle_pointer(
        PointerInput::TouchMove {
            pointer_id: 7,
            screen: DVec2::new(140.0, 100.0),
            time_ms: 80,
        },
        &surface,
    );
    controller.tick(700, &surface);
    controller.handle_pointer(touch_end(140.0, 100.0, 800), &surface);

    assert!(events.try_iter().next().is_none());
}

#[test]
fn test_configured_long_press_threshold_is_used() {
    let mut store = MapStore::new();
    let options = EngineOptions {
        long_press_ms: 1200,
        ..EngineOptions::default()
    };
    let mut controller =
        MapController::new(&options, HandlerRegistry::new(), &mut store, InputModel::Touch);
    let surface = surface();

    controller.handle_pointer(touch_start(10.0, 10.0, 0), &surface);
    assert!(controller.tick(800, &surface).is_empty());

    let events = controller.handle_pointer(touch_end(10.0, 10.0, 900), &surface);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].class(), PointerEventClass::Click);
}
