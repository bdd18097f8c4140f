//! Static tables of the grammar: argument arity of commands, and the special command and
//! environment families.

/// Declared argument arity of a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Signature {
    pub required: u8,
    pub optional: u8,
}

impl Signature {
    const fn new(required: u8, optional: u8) -> Self {
        Self { required, optional }
    }
}

/// Returns the argument signature of the given command name (without `\` and without a
/// trailing `*`).
///
/// Commands not listed here take no arguments.
#[rustfmt::skip]
pub fn signature(name: &str) -> Signature {
    match name {
        "frac" | "dfrac" | "tfrac" | "cfrac"
        | "binom" | "dbinom" | "tbinom"
        | "overset" | "underset" | "stackrel" => Signature::new(2, 0),
        "genfrac" => Signature::new(6, 0),
        "sqrt" => Signature::new(1, 1),
        "text" | "textrm" | "textbf" | "textit" | "mbox" | "operatorname"
        | "mathrm" | "mathbf" | "mathbb" | "mathcal" | "mathfrak" | "mathsf" | "mathit"
        | "mathscr" | "boldsymbol" | "bm" => Signature::new(1, 0),
        "hat" | "bar" | "dot" | "ddot" | "vec" | "tilde" | "check" | "breve" | "acute" | "grave"
        | "overline" | "underline" | "widehat" | "widetilde"
        | "overbrace" | "underbrace" | "overrightarrow" | "overleftarrow"
        | "underleftarrow" | "underrightarrow" => Signature::new(1, 0),
        "pmod" | "boxed" | "phantom" | "cancel" => Signature::new(1, 0),
        _ => Signature::default(),
    }
}

/// Commands that are followed by exactly one raw delimiter token.
pub fn is_delimiter_sizing(name: &str) -> bool {
    matches!(
        name,
        "left" | "right" | "middle"
            | "big" | "Big" | "bigg" | "Bigg"
            | "bigl" | "Bigl" | "biggl" | "Biggl"
            | "bigr" | "Bigr" | "biggr" | "Biggr"
            | "bigm" | "Bigm" | "biggm" | "Biggm"
    )
}

/// Delimiter-sizing commands that must stay outside of any marker, so that the renderer can
/// pair them.
pub fn is_paired_delimiter(name: &str) -> bool {
    matches!(name, "left" | "right" | "middle")
}

/// Large operators, which keep their limits modifiers and scripts in the same atom.
pub fn is_large_operator(name: &str) -> bool {
    matches!(
        name,
        "sum" | "prod" | "coprod"
            | "int" | "oint" | "iint" | "iiint" | "iiiint" | "idotsint" | "oiint" | "oiiint"
            | "bigcup" | "bigcap" | "bigsqcup" | "bigvee" | "bigwedge"
            | "bigodot" | "bigotimes" | "bigoplus" | "biguplus"
            | "lim" | "limsup" | "liminf" | "max" | "min" | "sup" | "inf"
            | "det" | "gcd" | "Pr"
    )
}

/// Commands that only make sense inside an alignment environment, and that are passed to
/// the renderer without a marker.
pub fn is_alignment_rule(name: &str) -> bool {
    matches!(name, "hline" | "hdashline")
}

/// Single characters that are rendered as arithmetic, relation or punctuation operators.
pub fn is_operator_char(c: char) -> bool {
    matches!(
        c,
        '+' | '-' | '=' | '<' | '>' | '*' | '/' | '|' | ':' | ';' | ',' | '!' | '?'
    )
}

/// The number of raw (unparsed) brace arguments an alignment environment takes after its
/// name, or `None` if the environment is not supported.
pub fn environment_arguments(name: &str) -> Option<u8> {
    Some(match name {
        "matrix" | "pmatrix" | "bmatrix" | "Bmatrix" | "vmatrix" | "Vmatrix" | "smallmatrix"
        | "cases" | "rcases" | "dcases" | "aligned" | "gathered" | "split" | "align" | "align*"
        | "gather" | "gather*" | "equation" | "equation*" => 0,
        "array" | "alignedat" | "darray" => 1,
        _ => return None,
    })
}
