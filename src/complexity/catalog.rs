//! Rarity tiers of commands.
//!
//! Commands are sorted in four tiers, from the ones every student meets in their first
//! exercises to the ones the renderer does not know at all. The tier of a command is what the
//! `command_rarity_load` feature sums over.

/// The rarity tier of a command word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CommandTier {
    /// Commands of a first course: `\frac`, `\alpha`, `\sum`, ...
    VeryCommon,
    /// Commands that show up regularly past a first course: `\Gamma`, `\dfrac`, `\begin`, ...
    Common,
    /// Commands the renderer supports, but that are seldom typed.
    KnownRare,
    /// Commands the renderer does not support.
    Unknown,
}

impl CommandTier {
    pub const fn weight(self) -> f64 {
        match self {
            CommandTier::VeryCommon => 0.4,
            CommandTier::Common => 1.0,
            CommandTier::KnownRare => 1.9,
            CommandTier::Unknown => 2.8,
        }
    }
}

/// Returns the tier of a command word, given its name without the leading `\`.
pub fn command_tier(name: &str) -> CommandTier {
    if is_very_common(name) {
        CommandTier::VeryCommon
    } else if is_common(name) {
        CommandTier::Common
    } else if is_known_rare(name) {
        CommandTier::KnownRare
    } else {
        CommandTier::Unknown
    }
}

/// Returns the rarity weight of a command token.
///
/// Control symbols (`\,`, `\{`, ...) always weigh as much as the most common commands.
pub fn command_tier_weight(name: &str, is_control_symbol: bool) -> f64 {
    if is_control_symbol {
        CommandTier::VeryCommon.weight()
    } else {
        command_tier(name).weight()
    }
}

/// Whether the renderer supports the command word.
pub fn is_known_command(name: &str) -> bool {
    command_tier(name) != CommandTier::Unknown
}

#[rustfmt::skip]
fn is_very_common(name: &str) -> bool {
    matches!(
        name,
        "alpha" | "approx" | "beta" | "binom" | "cap" | "cdot" | "cos" | "cup" | "delta" | "det"
            | "epsilon" | "equiv" | "exists" | "exp" | "forall" | "frac" | "gamma" | "geq"
            | "hat" | "iff" | "implies" | "in" | "infty" | "int" | "lambda" | "leq" | "left"
            | "lim" | "ln" | "log" | "mathbb" | "mathcal" | "mathfrak" | "mathbf" | "mathrm"
            | "middle" | "mu" | "nabla" | "neg" | "neq" | "oint" | "operatorname" | "partial"
            | "phi" | "pi" | "pm" | "pmod" | "prod" | "rho" | "right" | "sigma" | "sim" | "sin"
            | "sqrt" | "subseteq" | "sum" | "tan" | "text" | "theta" | "times" | "to"
            | "varphi" | "vee" | "wedge" | "zeta"
    )
}

#[rustfmt::skip]
fn is_common(name: &str) -> bool {
    matches!(
        name,
        "Big" | "Bigg" | "Bigl" | "Bigr" | "Gamma" | "Im" | "Lambda" | "Omega" | "Phi" | "Pi"
            | "Psi" | "Re" | "Sigma" | "Theta" | "Upsilon" | "Xi" | "arctan" | "bar" | "begin"
            | "big" | "bigcap" | "bigcup" | "bigsqcup" | "bigvee" | "bigwedge" | "coloneqq"
            | "ddot" | "dbinom" | "dfrac" | "dots" | "emptyset" | "end" | "genfrac" | "iint"
            | "iiint" | "iiiint" | "lVert" | "leftarrow" | "leftrightarrow" | "limits"
            | "mathscr" | "mod" | "nolimits" | "operatorname*" | "overline" | "rVert"
            | "rightarrow" | "sec" | "sideset" | "sinh" | "smallsetminus" | "subset" | "supset"
            | "supseteq" | "tbinom" | "tfrac" | "underline" | "vec" | "widehat" | "widetilde"
    )
}

/// Commands supported by the renderer that are in neither of the common tiers.
#[rustfmt::skip]
fn is_known_rare(name: &str) -> bool {
    matches!(
        name,
        // greek
        "eta" | "iota" | "kappa" | "nu" | "xi" | "omicron" | "tau" | "upsilon" | "chi" | "psi"
            | "omega" | "varepsilon" | "vartheta" | "varpi" | "varrho" | "varsigma" | "varkappa"
            | "digamma" | "Delta" | "varGamma" | "varDelta" | "varTheta" | "varLambda" | "varXi"
            | "varPi" | "varSigma" | "varUpsilon" | "varPhi" | "varPsi" | "varOmega"
        // letter-like and miscellaneous symbols
            | "aleph" | "beth" | "gimel" | "hbar" | "hslash" | "ell" | "wp" | "imath" | "jmath"
            | "varnothing" | "angle" | "measuredangle" | "triangle" | "square" | "Box"
            | "blacksquare" | "diamond" | "Diamond" | "lozenge" | "star" | "bigstar" | "prime"
            | "backprime" | "flat" | "natural" | "sharp" | "clubsuit" | "diamondsuit"
            | "heartsuit" | "spadesuit" | "checkmark" | "dagger" | "ddagger" | "degree"
            | "complement" | "nexists" | "top" | "bot" | "therefore" | "because" | "infin"
        // binary operators
            | "circ" | "bullet" | "ast" | "oplus" | "ominus" | "otimes" | "oslash" | "odot"
            | "setminus" | "div" | "mp" | "wr" | "amalg" | "sqcap" | "sqcup" | "uplus"
            | "land" | "lor" | "lnot" | "cdotp" | "ldotp" | "dotplus" | "ltimes" | "rtimes"
            | "bigtriangleup" | "bigtriangledown" | "triangleleft" | "triangleright"
        // relations
            | "le" | "ge" | "ne" | "ll" | "gg" | "lll" | "ggg" | "leqq" | "geqq" | "leqslant"
            | "geqslant" | "lessgtr" | "gtrless" | "gtr" | "less" | "lt" | "gt" | "prec" | "succ"
            | "preceq" | "succeq" | "propto" | "perp" | "parallel" | "nparallel" | "mid"
            | "nmid" | "simeq" | "cong" | "asymp" | "doteq" | "models" | "vdash" | "dashv"
            | "notin" | "ni" | "subsetneq" | "supsetneq" | "sqsubset" | "sqsupset"
            | "sqsubseteq" | "sqsupseteq" | "nsubseteq" | "nsupseteq" | "approxeq" | "backsim"
            | "thicksim" | "bowtie" | "smile" | "frown" | "vartriangleleft" | "vartriangleright"
            | "nless" | "ngtr" | "nleq" | "ngeq" | "ncong" | "nsim" | "eqsim" | "eqcirc"
            | "coloneq" | "eqqcolon" | "Coloneqq" | "vcentcolon"
        // arrows
            | "Rightarrow" | "Leftarrow" | "Leftrightarrow" | "longrightarrow" | "longleftarrow"
            | "longleftrightarrow" | "Longrightarrow" | "Longleftarrow" | "Longleftrightarrow"
            | "mapsto" | "longmapsto" | "hookrightarrow" | "hookleftarrow" | "uparrow"
            | "downarrow" | "updownarrow" | "Uparrow" | "Downarrow" | "Updownarrow" | "nearrow"
            | "searrow" | "swarrow" | "nwarrow" | "rightleftharpoons" | "leftrightarrows"
            | "rightrightarrows" | "leftharpoonup" | "rightharpoonup" | "leadsto" | "gets"
            | "impliedby" | "xrightarrow" | "xleftarrow" | "xmapsto" | "twoheadrightarrow"
            | "rightsquigarrow" | "circlearrowleft" | "circlearrowright" | "curvearrowright"
        // large operators
            | "coprod" | "bigodot" | "bigotimes" | "bigoplus" | "biguplus" | "intop"
            | "smallint" | "oiint" | "oiiint" | "idotsint"
        // named functions
            | "arcsin" | "arccos" | "arccot" | "arcsec" | "arccsc" | "cosh" | "tanh" | "coth"
            | "cot" | "csc" | "sech" | "csch" | "deg" | "dim" | "gcd" | "hom" | "inf" | "ker"
            | "lg" | "liminf" | "limsup" | "max" | "min" | "Pr" | "sup" | "arg" | "argmax"
            | "argmin" | "varliminf" | "varlimsup" | "injlim" | "projlim" | "sgn" | "tg" | "ctg"
            | "bmod" | "pod"
        // delimiters
            | "langle" | "rangle" | "lceil" | "rceil" | "lfloor" | "rfloor" | "lvert" | "rvert"
            | "vert" | "Vert" | "lbrace" | "rbrace" | "lbrack" | "rbrack" | "backslash"
            | "ulcorner" | "urcorner" | "llcorner" | "lrcorner" | "lgroup" | "rgroup"
            | "lmoustache" | "rmoustache" | "bigl" | "bigr" | "bigm" | "Bigm" | "bigg" | "biggl"
            | "biggr" | "biggm" | "Biggl" | "Biggr" | "Biggm"
        // dots and spacing
            | "cdots" | "ldots" | "vdots" | "ddots" | "dotsb" | "dotsc" | "dotsi" | "dotsm"
            | "dotso" | "quad" | "qquad" | "enspace" | "thinspace" | "medspace" | "thickspace"
            | "negthinspace" | "negmedspace" | "negthickspace" | "hspace" | "hskip" | "kern"
            | "mkern" | "mskip" | "space" | "nobreakspace"
        // accents and decorations
            | "tilde" | "check" | "breve" | "acute" | "grave" | "dot" | "mathring" | "dddot"
            | "overbrace" | "underbrace" | "overrightarrow" | "overleftarrow" | "underleftarrow"
            | "underrightarrow" | "overleftrightarrow" | "overset" | "underset" | "stackrel"
            | "overgroup" | "undergroup" | "utilde" | "widecheck" | "boxed" | "cancel"
            | "bcancel" | "xcancel" | "sout" | "not"
        // fractions and structure
            | "cfrac" | "choose" | "atop" | "over" | "brace" | "brack" | "substack" | "tag"
            | "notag" | "nonumber" | "label" | "hline" | "hdashline" | "cr" | "newline"
            | "phantom" | "hphantom" | "vphantom" | "smash" | "mathllap" | "mathrlap"
            | "mathclap" | "llap" | "rlap" | "clap" | "raisebox"
        // fonts and styles
            | "mathit" | "mathsf" | "mathtt" | "mathnormal" | "boldsymbol" | "bm" | "pmb"
            | "Bbb" | "bold" | "frak" | "textbf" | "textit" | "textrm" | "textsf" | "texttt"
            | "textnormal" | "textup" | "emph" | "mbox" | "hbox" | "displaystyle" | "textstyle"
            | "scriptstyle" | "scriptscriptstyle" | "rm" | "bf" | "it" | "sf" | "tt" | "cal"
            | "tiny" | "small" | "normalsize" | "large" | "Large" | "LARGE" | "huge" | "Huge"
            | "color" | "textcolor" | "colorbox" | "fcolorbox"
        // classes
            | "mathop" | "mathbin" | "mathrel" | "mathord" | "mathopen" | "mathclose"
            | "mathpunct" | "mathinner" | "operatornamewithlimits" | "displaylimits"
    )
}
