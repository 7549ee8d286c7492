//! Built-in widget styles
//!
//! [`Theme::install`] registers every built-in style record in a tree's
//! style store once. Widget factories take the theme by reference and bind
//! the records they need; applications can restyle all widgets of a kind at
//! once through [`ObjTree::edit_shared_style`].

use kiln_core::{Color, LabelStyle, ObjStyle, ObjTree, RectStyle, StyleId};
use tracing::debug;

use crate::config::WidgetConfig;
use crate::page::{PageStyle, ScrollbarMode};
use crate::text_area::TextAreaStyle;

/// Built-in text area looks
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TextAreaStyleKind {
    /// Bordered background with a visible cursor
    Default,
    /// Flat background, tighter padding
    Simple,
    /// No background at all
    Transparent,
}

#[derive(Clone, Copy, Debug)]
pub struct LabelStyles {
    pub text: StyleId,
}

#[derive(Clone, Copy, Debug)]
pub struct PageStyles {
    pub default: StyleId,
    pub simple: StyleId,
    pub transparent: StyleId,
    /// Scrollable part of the default page
    pub scrl_default: StyleId,
    /// Scrollable part of the simple and transparent pages
    pub scrl_simple: StyleId,
}

#[derive(Clone, Copy, Debug)]
pub struct TextAreaStyles {
    pub default: StyleId,
    pub simple: StyleId,
    pub transparent: StyleId,
}

/// Style records and defaults shared by all widgets of a tree
#[derive(Clone, Debug)]
pub struct Theme {
    config: WidgetConfig,
    pub label: LabelStyles,
    pub page: PageStyles,
    pub text_area: TextAreaStyles,
}

impl Theme {
    /// Register the built-in styles in `tree`
    pub fn install(tree: &mut ObjTree, config: &WidgetConfig) -> Self {
        let label_text = tree.register_style(LabelStyle::text());

        let scrl_default = tree.register_style(RectStyle::transparent().with_pad(8, 8));
        let scrl_simple = tree.register_style(RectStyle::transparent().with_pad(4, 4));

        let sb = RectStyle::from_obj(ObjStyle {
            color: Color::GRAY,
            transp: false,
        })
        .with_radius(2);

        let page_default = PageStyle {
            bg: RectStyle::plain()
                .with_border(Color::GRAY, 2)
                .with_radius(4)
                .with_pad(4, 4),
            scrl: scrl_default,
            sb,
            sb_width: 6,
            sb_mode: ScrollbarMode::Auto,
        };
        let page_simple = PageStyle {
            bg: RectStyle::plain(),
            scrl: scrl_simple,
            ..page_default
        };
        let page_transparent = PageStyle {
            bg: RectStyle::transparent(),
            scrl: scrl_simple,
            sb_mode: ScrollbarMode::Off,
            ..page_default
        };

        let ta = |page: PageStyle| TextAreaStyle {
            page,
            label: label_text,
            cursor_color: Color::BLACK,
            cursor_width: 2,
            cursor_show: true,
        };

        let theme = Self {
            config: config.clone(),
            label: LabelStyles { text: label_text },
            page: PageStyles {
                default: tree.register_style(page_default),
                simple: tree.register_style(page_simple),
                transparent: tree.register_style(page_transparent),
                scrl_default,
                scrl_simple,
            },
            text_area: TextAreaStyles {
                default: tree.register_style(ta(page_default)),
                simple: tree.register_style(ta(page_simple)),
                transparent: tree.register_style(ta(page_transparent)),
            },
        };
        debug!("installed widget theme ({} styles)", tree.styles().len());
        theme
    }

    pub fn config(&self) -> &WidgetConfig {
        &self.config
    }

    /// Record of a built-in text area look
    pub fn text_area_style(&self, kind: TextAreaStyleKind) -> StyleId {
        match kind {
            TextAreaStyleKind::Default => self.text_area.default,
            TextAreaStyleKind::Simple => self.text_area.simple,
            TextAreaStyleKind::Transparent => self.text_area.transparent,
        }
    }
}
