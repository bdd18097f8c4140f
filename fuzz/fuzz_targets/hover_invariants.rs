#![no_main]

use libfuzzer_sys::fuzz_target;
use latex_drill::{hover::instrument, HoverConfig, Parser, PreviewRenderer};

fuzz_target!(|data: &str| {
    let render = instrument(&PreviewRenderer, &HoverConfig::default(), data);

    if Parser::new(data).parse().is_err() {
        assert!(render.atoms.is_empty());
        return;
    }

    // Every atom must point back at the exact slice of the input it was read from.
    for atom in render.atoms.iter() {
        assert_eq!(data.get(atom.start..atom.end), Some(atom.snippet.as_str()));
        assert!(render.html.contains(&format!(r#"data-ltx-id="{}""#, atom.id)));
    }
    for a in render.atoms.iter() {
        for b in render.atoms.iter() {
            assert!(a.is_disjoint(b) || a.contains(b) || b.contains(a));
        }
    }
    if render.atoms.is_empty() {
        assert!(!render.html.contains("data-ltx-id"));
    }
});
