//! The files of a generated project, embedded in the binary.

use crate::options::{CssPreprocessor, OptionSet, TemplateEngine};

/// One generated file.
#[derive(Debug, Clone, Copy)]
pub struct Boilerplate {
    /// Target below the project directory. Rendered with the scaffold context.
    pub target: &'static str,
    pub content: &'static str,
    /// Whether `content` is a template.
    pub render: bool,
    pub include: fn(&OptionSet) -> bool,
}

const fn file(
    target: &'static str,
    content: &'static str,
    render: bool,
    include: fn(&OptionSet) -> bool,
) -> Boilerplate {
    Boilerplate { target, content, render, include }
}

fn always(_: &OptionSet) -> bool {
    true
}

fn libs(options: &OptionSet) -> bool {
    options.include_helper_libs
}

fn transpiler(options: &OptionSet) -> bool {
    options.use_transpiler
}

fn plain_html(options: &OptionSet) -> bool {
    !options.template_engine.is_active()
}

fn jade(options: &OptionSet) -> bool {
    options.template_engine == TemplateEngine::Jade
}

fn css(options: &OptionSet) -> bool {
    options.css_preprocessor == CssPreprocessor::Css
}

fn less(options: &OptionSet) -> bool {
    options.css_preprocessor == CssPreprocessor::Less
}

fn sass(options: &OptionSet) -> bool {
    options.css_preprocessor == CssPreprocessor::Sass
}

fn stylus(options: &OptionSet) -> bool {
    options.css_preprocessor == CssPreprocessor::Stylus
}

pub const BOILERPLATE: &[Boilerplate] = &[
    file("package.json", include_str!("../../templates/package.json.j2"), true, always),
    file("bower.json", include_str!("../../templates/bower.json.j2"), true, libs),
    file("readme.md", include_str!("../../templates/readme.md.j2"), true, always),
    file(".gitignore", include_str!("../../templates/gitignore"), false, always),
    file(".gitattributes", include_str!("../../templates/gitattributes"), false, always),
    file(".bowerrc", include_str!("../../templates/bowerrc.j2"), true, libs),
    file(".jshintrc", include_str!("../../templates/jshintrc"), false, always),
    file(".htmlhintrc", include_str!("../../templates/htmlhintrc"), false, plain_html),
    file(".babelrc", include_str!("../../templates/babelrc"), false, transpiler),
    file(".csslintrc", include_str!("../../templates/csslintrc"), false, css),
    file(".lesshintrc", include_str!("../../templates/lesshintrc"), false, less),
    file(".sass-lint.yml", include_str!("../../templates/sass-lint.yml"), false, sass),
    file(".stylintrc", include_str!("../../templates/stylintrc"), false, stylus),
    file("{{ src }}/index.html", include_str!("../../templates/app/index.html.j2"), true, plain_html),
    file(
        "{{ src }}/{{ templates_dir }}/_layout.jade",
        include_str!("../../templates/app/jade/_layout.jade.j2"),
        true,
        jade,
    ),
    file(
        "{{ src }}/{{ templates_dir }}/index.jade",
        include_str!("../../templates/app/jade/index.jade.j2"),
        true,
        jade,
    ),
    file("{{ src }}/{{ scripts_dir }}/main.js", include_str!("../../templates/app/scripts/main.js"), false, always),
    file("{{ src }}/{{ styles_dir }}/style.css", include_str!("../../templates/app/styles/style.css"), false, css),
    file("{{ src }}/{{ styles_dir }}/style.less", include_str!("../../templates/app/styles/style.less"), false, less),
    file(
        "{{ src }}/{{ styles_dir }}/variables.less",
        include_str!("../../templates/app/styles/variables.less"),
        false,
        less,
    ),
    file("{{ src }}/{{ styles_dir }}/style.scss", include_str!("../../templates/app/styles/style.scss"), false, sass),
    file(
        "{{ src }}/{{ styles_dir }}/_variables.scss",
        include_str!("../../templates/app/styles/_variables.scss"),
        false,
        sass,
    ),
    file("{{ src }}/{{ styles_dir }}/style.styl", include_str!("../../templates/app/styles/style.styl"), false, stylus),
    file(
        "{{ src }}/{{ styles_dir }}/variables.styl",
        include_str!("../../templates/app/styles/variables.styl"),
        false,
        stylus,
    ),
];

/// Files generated for `options`, in a stable order.
pub fn selected(options: &OptionSet) -> impl Iterator<Item = &'static Boilerplate> + '_ {
    BOILERPLATE.iter().filter(move |file| (file.include)(options))
}
