//! Flex message card attached to successful clock-in/out responses.
//!
//! The card is a pure function of the resolved [`PunchView`]; it is rebuilt
//! for every response and never mutated after construction.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::punch::{CardDefaults, PunchAction, PunchView};
use crate::record::Record;
use crate::time::{format_date_tw, format_time_tw};

pub const HEADER_TITLE: &str = "H.R燈藝｜員工打卡";
pub const LIFF_BASE_URL: &str = "https://liff.line.me";

const COLOR_LABEL: &str = "#6B7280";
const COLOR_VALUE: &str = "#111827";
const COLOR_OK: &str = "#166534";
const COLOR_WARN: &str = "#B91C1C";
const COLOR_DIVIDER: &str = "#E5E7EB";

/// Top-level message object: what a messaging API expects to send.
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "type", rename = "flex", rename_all = "camelCase")]
pub struct FlexMessage {
    pub alt_text: String,
    pub contents: Bubble,
}

#[derive(Clone, Debug, Serialize)]
#[serde(tag = "type", rename = "bubble")]
pub struct Bubble {
    pub size: &'static str,
    pub header: FlexBox,
    pub body: FlexBox,
    pub footer: FlexBox,
}

#[derive(Clone, Debug, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Component {
    Box(FlexBox),
    Text(Text),
    Separator(Separator),
    Filler,
    Button(Button),
}

#[derive(Clone, Copy, Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    Vertical,
    Horizontal,
    Baseline,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlexBox {
    pub layout: Layout,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flex: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spacing: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub padding_all: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub padding_start: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub padding_end: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub corner_radius: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub align_items: Option<&'static str>,
    pub contents: Vec<Component>,
}

impl FlexBox {
    pub fn new(layout: Layout, contents: Vec<Component>) -> Self {
        Self {
            layout,
            flex: None,
            spacing: None,
            margin: None,
            padding_all: None,
            padding_start: None,
            padding_end: None,
            background_color: None,
            corner_radius: None,
            align_items: None,
            contents,
        }
    }

    fn flex(mut self, flex: u8) -> Self {
        self.flex = Some(flex);
        self
    }

    fn spacing(mut self, spacing: &'static str) -> Self {
        self.spacing = Some(spacing);
        self
    }

    fn margin(mut self, margin: &'static str) -> Self {
        self.margin = Some(margin);
        self
    }

    fn padding_all(mut self, padding: &'static str) -> Self {
        self.padding_all = Some(padding);
        self
    }

    fn background(mut self, color: &'static str) -> Self {
        self.background_color = Some(color);
        self
    }

    fn align_items(mut self, align: &'static str) -> Self {
        self.align_items = Some(align);
        self
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct Text {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flex: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wrap: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub align: Option<&'static str>,
}

impl Text {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            size: None,
            weight: None,
            color: None,
            flex: None,
            wrap: None,
            align: None,
        }
    }

    fn size(mut self, size: &'static str) -> Self {
        self.size = Some(size);
        self
    }

    fn bold(mut self) -> Self {
        self.weight = Some("bold");
        self
    }

    fn color(mut self, color: &'static str) -> Self {
        self.color = Some(color);
        self
    }

    fn flex(mut self, flex: u8) -> Self {
        self.flex = Some(flex);
        self
    }

    fn wrap(mut self) -> Self {
        self.wrap = Some(true);
        self
    }

    fn align_end(mut self) -> Self {
        self.align = Some("end");
        self
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct Separator {
    pub margin: &'static str,
    pub color: &'static str,
}

#[derive(Clone, Debug, Serialize)]
pub struct Button {
    pub style: &'static str,
    pub action: ButtonAction,
}

#[derive(Clone, Debug, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ButtonAction {
    Uri { label: String, uri: String },
}

impl From<FlexBox> for Component {
    fn from(value: FlexBox) -> Self {
        Component::Box(value)
    }
}

impl From<Text> for Component {
    fn from(value: Text) -> Self {
        Component::Text(value)
    }
}

/// Pages inside the client app reachable from the card footer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeepLink {
    Clock,
    Logs,
    Schedule,
}

impl DeepLink {
    pub fn state(self) -> &'static str {
        match self {
            DeepLink::Clock => "clock",
            DeepLink::Logs => "/logs",
            DeepLink::Schedule => "schedule",
        }
    }

    pub fn url(self, liff_id: &str) -> String {
        format!("{LIFF_BASE_URL}/{liff_id}?liff.state={}", self.state())
    }
}

/// Resolve fields from the raw records and lay out the card.
pub fn synthesize(
    request: &Record,
    result: &Record,
    defaults: &CardDefaults,
    now: DateTime<Utc>,
) -> FlexMessage {
    build_punch_card(&PunchView::resolve(request, result, defaults, now))
}

pub fn build_punch_card(view: &PunchView) -> FlexMessage {
    let date = format_date_tw(view.at);
    let time = format_time_tw(view.at);
    let label = view.action.label();

    let bubble = Bubble {
        size: "mega",
        header: FlexBox::new(
            Layout::Vertical,
            vec![Text::new(HEADER_TITLE).size("sm").bold().color("#F5D34D").into()],
        )
        .background("#0F172A")
        .padding_all("14px"),
        body: FlexBox::new(Layout::Vertical, body_rows(view, label, &time, &date))
            .padding_all("16px")
            .spacing("md"),
        footer: FlexBox::new(
            Layout::Vertical,
            vec![
                button("primary", "開啟打卡頁面", DeepLink::Clock, &view.liff_id),
                button("secondary", "查看出勤紀錄", DeepLink::Logs, &view.liff_id),
                button("secondary", "查看班表", DeepLink::Schedule, &view.liff_id),
            ],
        )
        .padding_all("14px")
        .spacing("sm"),
    };

    FlexMessage {
        alt_text: format!("{label} {time}"),
        contents: bubble,
    }
}

fn body_rows(view: &PunchView, label: &str, time: &str, date: &str) -> Vec<Component> {
    let (chip_bg, chip_fg) = match view.action {
        PunchAction::In => ("#DCFCE7", COLOR_OK),
        PunchAction::Out => (COLOR_DIVIDER, COLOR_VALUE),
    };

    let mut rows: Vec<Component> = vec![
        FlexBox::new(
            Layout::Horizontal,
            vec![
                Text::new("你已打卡成功")
                    .size("md")
                    .bold()
                    .color("#065F46")
                    .flex(6)
                    .into(),
                chip(view.action.as_str(), chip_bg, chip_fg),
            ],
        )
        .align_items("center")
        .into(),
        FlexBox::new(
            Layout::Horizontal,
            vec![
                Text::new(label).size("lg").bold().color("#374151").flex(5).into(),
                Text::new(time)
                    .size("xxl")
                    .bold()
                    .color(COLOR_VALUE)
                    .flex(5)
                    .align_end()
                    .into(),
            ],
        )
        .margin("lg")
        .align_items("baseline")
        .into(),
        FlexBox::new(
            Layout::Horizontal,
            vec![
                Text::new("日期").size("sm").color(COLOR_LABEL).flex(3).into(),
                Text::new(date)
                    .size("sm")
                    .color(COLOR_VALUE)
                    .flex(7)
                    .align_end()
                    .into(),
            ],
        )
        .margin("md")
        .into(),
        divider(),
        kv_row("打卡地點", &view.location_name, COLOR_VALUE),
    ];

    if let Some((distance, fence)) = view.fence_check() {
        let color = if distance <= fence { COLOR_OK } else { COLOR_WARN };
        rows.push(kv_row(
            "距離店面",
            &format!("{}m / {}m", round_half_up(distance), round_half_up(fence)),
            color,
        ));
    }

    match view.lateness() {
        Some(mins) => rows.push(
            FlexBox::new(
                Layout::Horizontal,
                vec![
                    Text::new("異常紀錄").size("sm").color(COLOR_LABEL).flex(3).into(),
                    FlexBox::new(
                        Layout::Horizontal,
                        vec![
                            Component::Filler,
                            chip(&format!("遲到 {mins} 分鐘"), "#FEE2E2", COLOR_WARN),
                        ],
                    )
                    .flex(7)
                    .into(),
                ],
            )
            .spacing("sm")
            .align_items("center")
            .into(),
        ),
        None => rows.push(kv_row("異常紀錄", "無", COLOR_OK)),
    }

    if let Some(note) = &view.note {
        rows.push(kv_row("事由備註", note, COLOR_VALUE));
    }
    if let Some(name) = &view.employee_name {
        rows.push(kv_row("打卡人員", name, COLOR_VALUE));
    }

    rows.push(divider());
    rows
}

fn kv_row(label: &str, value: &str, value_color: &'static str) -> Component {
    FlexBox::new(
        Layout::Baseline,
        vec![
            Text::new(label).size("sm").color(COLOR_LABEL).flex(3).into(),
            Text::new(value)
                .size("sm")
                .color(value_color)
                .flex(7)
                .wrap()
                .align_end()
                .into(),
        ],
    )
    .spacing("sm")
    .into()
}

fn chip(text: &str, background: &'static str, color: &'static str) -> Component {
    let mut chip = FlexBox::new(
        Layout::Vertical,
        vec![Text::new(text).size("xs").bold().color(color).into()],
    )
    .padding_all("4px")
    .background(background);
    chip.corner_radius = Some("999px");
    chip.padding_start = Some("10px");
    chip.padding_end = Some("10px");
    chip.into()
}

fn divider() -> Component {
    Component::Separator(Separator {
        margin: "lg",
        color: COLOR_DIVIDER,
    })
}

fn button(style: &'static str, label: &str, link: DeepLink, liff_id: &str) -> Component {
    Component::Button(Button {
        style,
        action: ButtonAction::Uri {
            label: label.to_string(),
            uri: link.url(liff_id),
        },
    })
}

/// Half-up rounding to a whole metre (`2.5 -> 3`, `-2.5 -> -2`).
fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}
