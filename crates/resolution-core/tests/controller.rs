// File: crates/resolution-core/tests/controller.rs
// Purpose: ChartController lifecycle against a recording render surface.

use std::cell::RefCell;
use std::rc::Rc;

use resolution_core::{
    ChartController, ChartError, EngineOptions, Marker, Prepared, RawSeries, RenderSurface, Resolution, SelectorOptions,
    SeriesData, SeriesError, SeriesKind, Side, Timeframe, TradeSignal,
};

const T0: i64 = 1_704_067_200;
const HOUR: i64 = 3600;

#[derive(Debug, Clone, PartialEq)]
enum Call {
    AddSeries(SeriesKind),
    SetData { kind: SeriesKind, len: usize },
    SetMarkers(Vec<Marker>),
    Resize(u32, u32),
}

#[derive(Clone, Default)]
struct Recorder(Rc<RefCell<Vec<Call>>>);

impl Recorder {
    fn calls(&self) -> Vec<Call> { self.0.borrow().clone() }
    fn clear(&self) { self.0.borrow_mut().clear() }
}

impl RenderSurface for Recorder {
    fn add_series(&mut self, kind: SeriesKind) { self.0.borrow_mut().push(Call::AddSeries(kind)) }
    fn set_data(&mut self, data: &SeriesData) {
        self.0.borrow_mut().push(Call::SetData { kind: data.kind(), len: data.len() })
    }
    fn set_markers(&mut self, markers: &[Marker]) { self.0.borrow_mut().push(Call::SetMarkers(markers.to_vec())) }
    fn resize(&mut self, width: u32, height: u32) { self.0.borrow_mut().push(Call::Resize(width, height)) }
}

fn hourly_line(n: usize) -> RawSeries {
    let ts = (0..n as i64).map(|i| (T0 + i * HOUR).to_string()).collect();
    let values = (0..n).map(|i| 10_000.0 + i as f64).collect();
    RawSeries::line(ts, values)
}

fn setup(id: &str) -> (ChartController, Recorder) {
    let mut ctl = ChartController::default();
    let rec = Recorder::default();
    assert!(ctl.attach(id, Box::new(rec.clone())).is_none());
    (ctl, rec)
}

#[test]
fn prepare_caches_all_resolutions_and_shows_finest() {
    let (mut ctl, rec) = setup("equity");
    let got = ctl.prepare("equity", &hourly_line(24 * 10)).expect("prepare");

    let want = vec![
        Resolution::Timeframe(Timeframe::Hour1),
        Resolution::Timeframe(Timeframe::Hour4),
        Resolution::Timeframe(Timeframe::Day1),
    ];
    assert_eq!(got, Prepared::Ready { resolutions: want.clone(), active: want[0] });
    assert_eq!(ctl.resolutions("equity").unwrap(), want);
    assert_eq!(ctl.active_resolution("equity").unwrap(), Some(want[0]));
    assert_eq!(
        rec.calls(),
        vec![
            Call::AddSeries(SeriesKind::Line),
            Call::SetData { kind: SeriesKind::Line, len: 240 },
            Call::SetMarkers(Vec::new()),
        ]
    );
}

#[test]
fn switching_resolution_swaps_cached_data() {
    let (mut ctl, rec) = setup("equity");
    ctl.prepare("equity", &hourly_line(24 * 10)).unwrap();
    let daily_before = ctl.dataset("equity", "1d").unwrap().clone();
    rec.clear();

    ctl.set_resolution("equity", "1d").unwrap();
    assert_eq!(ctl.active_resolution("equity").unwrap(), Some(Resolution::Timeframe(Timeframe::Day1)));
    // same kind: no new series, only data + markers
    assert_eq!(
        rec.calls(),
        vec![Call::SetData { kind: SeriesKind::Line, len: 10 }, Call::SetMarkers(Vec::new())]
    );

    ctl.set_resolution("equity", "1h").unwrap();
    ctl.set_resolution("equity", "1d").unwrap();
    assert_eq!(ctl.dataset("equity", "1d").unwrap(), &daily_before);
}

#[test]
fn unknown_resolution_is_rejected_without_rendering() {
    let (mut ctl, rec) = setup("equity");
    ctl.prepare("equity", &hourly_line(24 * 10)).unwrap();
    rec.clear();

    for name in ["1w", "raw", "2h", ""] {
        let err = ctl.set_resolution("equity", name).unwrap_err();
        assert_eq!(err, ChartError::UnknownResolution { chart: "equity".into(), name: name.into() });
    }
    assert!(rec.calls().is_empty());
    assert_eq!(ctl.active_resolution("equity").unwrap(), Some(Resolution::Timeframe(Timeframe::Hour1)));
}

#[test]
fn markers_follow_the_active_resolution() {
    let (mut ctl, rec) = setup("BTCUSDC");
    ctl.prepare("BTCUSDC", &hourly_line(24 * 10)).unwrap();

    let signals = vec![
        // on a 4h and a 1d boundary
        TradeSignal::new(T0, Side::Buy).with_symbol("BTCUSDC"),
        // only on the hourly grid
        TradeSignal::new(T0 + 5 * HOUR, Side::Sell).with_symbol("BTCUSDC"),
        // on a 4h boundary
        TradeSignal::new(T0 + 8 * HOUR, Side::Sell),
        // another pair
        TradeSignal::new(T0 + HOUR, Side::Buy).with_symbol("ETHUSDC"),
    ];
    ctl.set_signals("BTCUSDC", signals, Some("BTCUSDC".into())).unwrap();
    let times = |ctl: &ChartController| ctl.markers("BTCUSDC").unwrap().iter().map(|m| m.time).collect::<Vec<_>>();
    assert_eq!(times(&ctl), vec![T0, T0 + 5 * HOUR, T0 + 8 * HOUR]);

    ctl.set_resolution("BTCUSDC", "4h").unwrap();
    assert_eq!(times(&ctl), vec![T0, T0 + 8 * HOUR]);

    ctl.set_resolution("BTCUSDC", "1d").unwrap();
    assert_eq!(times(&ctl), vec![T0]);
    assert_eq!(rec.calls().last(), Some(&Call::SetMarkers(vec![Marker::for_side(T0, Side::Buy)])));
}

#[test]
fn resize_is_a_passthrough() {
    let (mut ctl, rec) = setup("equity");
    ctl.resize("equity", 800, 600).unwrap();
    assert_eq!(rec.calls(), vec![Call::Resize(800, 600)]);

    ctl.prepare("equity", &hourly_line(48)).unwrap();
    rec.clear();
    ctl.resize("equity", 1024, 640).unwrap();
    assert_eq!(rec.calls(), vec![Call::Resize(1024, 640)]);
}

#[test]
fn insufficient_data_clears_the_chart() {
    let (mut ctl, rec) = setup("equity");
    ctl.prepare("equity", &hourly_line(48)).unwrap();
    rec.clear();

    let got = ctl.prepare("equity", &hourly_line(1)).unwrap();
    assert_eq!(got, Prepared::NoData);
    assert!(ctl.resolutions("equity").unwrap().is_empty());
    assert_eq!(ctl.active_resolution("equity").unwrap(), None);
    assert_eq!(
        rec.calls(),
        vec![Call::SetData { kind: SeriesKind::Line, len: 0 }, Call::SetMarkers(Vec::new())]
    );
}

#[test]
fn fatal_batch_keeps_previous_cache() {
    let (mut ctl, _rec) = setup("equity");
    ctl.prepare("equity", &hourly_line(48)).unwrap();
    let before = ctl.resolutions("equity").unwrap();

    let dup = RawSeries::line(vec![T0.to_string(), T0.to_string()], vec![1.0, 2.0]);
    let err = ctl.prepare("equity", &dup).unwrap_err();
    assert_eq!(err, ChartError::Series(SeriesError::InvalidSeries { interval: 0 }));
    assert_eq!(ctl.resolutions("equity").unwrap(), before);
}

#[test]
fn out_of_order_batch_is_rejected_and_surface_untouched() {
    let (mut ctl, rec) = setup("BTCUSDC");
    ctl.prepare("BTCUSDC", &hourly_line(48)).unwrap();
    rec.clear();

    let ts = [0, 1, 2, -1, 3].iter().map(|i| (T0 + i * HOUR).to_string()).collect();
    let shuffled = RawSeries::line(ts, vec![1.0; 5]);
    let err = ctl.prepare("BTCUSDC", &shuffled).unwrap_err();
    assert_eq!(err, ChartError::Series(SeriesError::InvalidSeries { interval: -3 * HOUR }));
    assert!(rec.calls().is_empty());

    let times = ctl.dataset("BTCUSDC", "1h").unwrap().times();
    assert!(times.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn kind_change_re_adds_series() {
    let (mut ctl, rec) = setup("chart");
    ctl.prepare("chart", &hourly_line(48)).unwrap();
    rec.clear();

    let n = 48i64;
    let ts = (0..n).map(|i| (T0 + i * HOUR).to_string()).collect();
    let ones = vec![1.0; n as usize];
    let candles = RawSeries::candle(ts, ones.clone(), vec![2.0; n as usize], vec![0.5; n as usize], ones);
    ctl.prepare("chart", &candles).unwrap();
    assert_eq!(rec.calls()[0], Call::AddSeries(SeriesKind::Candle));
}

#[test]
fn short_series_offers_raw_only() {
    let (mut ctl, _rec) = setup("equity");
    let ts = (0..3).map(|i| (T0 + i * 60).to_string()).collect();
    let got = ctl.prepare("equity", &RawSeries::line(ts, vec![1.0, 2.0, 3.0])).unwrap();
    assert_eq!(got, Prepared::Ready { resolutions: vec![Resolution::Raw], active: Resolution::Raw });
    ctl.set_resolution("equity", "raw").unwrap();
}

#[test]
fn custom_options_shape_the_offer() {
    let opts = EngineOptions::default()
        .with_selector(SelectorOptions::default().with_catalog(vec![Timeframe::Hour4, Timeframe::Day1]).with_min_buckets(12.0));
    let mut ctl = ChartController::new(opts);
    ctl.attach("equity", Box::new(Recorder::default()));
    ctl.prepare("equity", &hourly_line(24 * 10)).unwrap();
    // 239h span: 4h yields ~60 buckets, 1d only ~10
    assert_eq!(ctl.resolutions("equity").unwrap(), vec![Resolution::Timeframe(Timeframe::Hour4)]);
}

#[test]
fn dispose_detaches_and_forgets() {
    let (mut ctl, _rec) = setup("equity");
    ctl.prepare("equity", &hourly_line(48)).unwrap();
    let _surface = ctl.dispose("equity").expect("surface back");

    assert!(!ctl.is_attached("equity"));
    assert_eq!(ctl.dispose("equity").err(), Some(ChartError::UnknownChart("equity".into())));
    assert_eq!(ctl.set_resolution("equity", "1h").unwrap_err(), ChartError::UnknownChart("equity".into()));
    assert!(ctl.resize("equity", 1, 1).is_err());
    assert!(ctl.prepare("equity", &hourly_line(48)).is_err());
}

#[test]
fn reattach_returns_previous_surface() {
    let (mut ctl, _rec) = setup("equity");
    assert!(ctl.attach("equity", Box::new(Recorder::default())).is_some());
    assert_eq!(ctl.chart_ids().collect::<Vec<_>>(), vec!["equity"]);
}
