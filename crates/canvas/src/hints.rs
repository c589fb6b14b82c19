use crate::tools::Tool;

/// How a hint fragment is highlighted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Emphasis {
    None,
    Constructive,
    Destructive,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HintSpan {
    pub text: &'static str,
    pub emphasis: Emphasis,
}

fn plain(text: &'static str) -> HintSpan {
    HintSpan {
        text,
        emphasis: Emphasis::None,
    }
}

fn good(text: &'static str) -> HintSpan {
    HintSpan {
        text,
        emphasis: Emphasis::Constructive,
    }
}

fn bad(text: &'static str) -> HintSpan {
    HintSpan {
        text,
        emphasis: Emphasis::Destructive,
    }
}

/// Hint line for the active tool. `picked` is the number of edge endpoints
/// picked so far.
pub fn hint_spans(tool: Tool, picked: usize) -> Vec<HintSpan> {
    match tool {
        Tool::AddEdge => vec![
            plain("Select the node you want to "),
            good(if picked == 0 {
                "connect from"
            } else {
                "connect to"
            }),
        ],
        Tool::RemoveEdge => vec![
            plain("Select the "),
            bad(if picked == 0 { "first" } else { "second" }),
            plain(" node of the pair you want to "),
            bad("disconnect"),
        ],
        Tool::AddNode => vec![
            plain("Click anywhere on the screen to "),
            good("create"),
            plain(" a node there"),
        ],
        Tool::DeleteNode => vec![
            plain("Click on a node to "),
            bad("permanently delete"),
            plain(" it"),
        ],
        Tool::CompleteNode => vec![plain("Click on a node to mark it as "), good("complete")],
        Tool::Pointer | Tool::Move => Vec::new(),
    }
}

pub fn hint_text(tool: Tool, picked: usize) -> String {
    hint_spans(tool, picked).iter().map(|span| span.text).collect()
}
