use furl_core::ManualTime;
use furl_ui::*;

const FRAME_MS: u64 = 16;

struct Field;

impl TextFieldHost for Field {
    fn blur(&mut self) {
        log::info!("field: blur()");
    }
}

struct List {
    offset: f32,
}

impl ScrollHost for List {
    fn scroll_to(&mut self, offset: f32) {
        log::info!("list: scroll_to({offset})");
        self.offset = offset;
    }
}

enum Step {
    Scroll(f32),
    Focus,
    Cancel,
    ScrollTo(f32),
    Wait(u64),
}

fn run_frames(
    header: &mut SearchHeader,
    time: &ManualTime,
    list: &mut List,
    ms: u64,
) -> anyhow::Result<()> {
    let mut waited = 0;
    while waited < ms {
        time.advance_ms(FRAME_MS);
        waited += FRAME_MS;
        if !header.needs_frame() {
            continue;
        }
        header.frame()?;
        if header.flush_scroll(list) {
            header.on_scroll(list.offset)?;
        }
        report(header)?;
    }
    Ok(())
}

fn report(header: &SearchHeader) -> anyhow::Result<()> {
    let o = header.outputs()?;
    log::info!(
        "{:>10} height={:6.1} padding={:6.1} margin={:5.1} cancel={:6.1}",
        format!("{:?}", header.phase()),
        o.header_height,
        o.content_padding_top,
        o.input_margin_right,
        o.cancel_translate_x,
    );
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let time = ManualTime::new();
    let mut header = SearchHeader::new(HeaderConfig::default(), time.clone())?;
    let mut field = Field;
    let mut list = List { offset: 0.0 };

    let script = [
        Step::Scroll(20.0),
        Step::Scroll(45.0),
        Step::Focus,
        Step::Wait(240),
        Step::Scroll(30.0),
        Step::Wait(300),
        Step::Cancel,
        Step::Wait(500),
        Step::ScrollTo(0.0),
        Step::Wait(32),
    ];

    report(&header)?;
    for step in script {
        match step {
            Step::Scroll(y) => {
                log::info!("-- scroll {y}");
                header.on_scroll(y)?;
                report(&header)?;
            }
            Step::Focus => {
                log::info!("-- focus");
                header.on_focus()?;
                report(&header)?;
            }
            Step::Cancel => {
                log::info!("-- cancel");
                header.on_cancel(&mut field)?;
                report(&header)?;
            }
            Step::ScrollTo(y) => {
                log::info!("-- scroll_to {y}");
                header.scroll_to(y);
            }
            Step::Wait(ms) => run_frames(&mut header, &time, &mut list, ms)?,
        }
    }

    header.on_scroll_end_drag();
    log::info!(
        "done: scroll={} focus={:?} armed={:?}",
        header.scroll_position(),
        header.focus()?,
        header.armed()?
    );
    Ok(())
}
