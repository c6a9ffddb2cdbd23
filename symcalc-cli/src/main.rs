use symcalc_array::{array, describe, shape_of, shaped, Arrays, ShapeBuilder};
use symcalc_core::{
    integers::{number, symbols, Integers},
    Expr,
    FormatOptionsBuilder,
    Index,
    Target,
};
use symcalc_error::Error;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Builds the demonstration expressions of the symbolic integers.
fn integer_demos() -> Result<Vec<(&'static str, Expr<Integers>)>, Error> {
    let [a, b, n, m, i, j] = symbols(["a", "b", "n", "m", "i", "j"]);
    let sum = a.checked_add(&b)?;
    let shape = ShapeBuilder::new([n, m]).build()?;
    let double = Expr::<Integers>::function("double", |args: &[Expr<Integers>]| match args {
        [x] => x.checked_mul(2).ok(),
        _ => None,
    });

    Ok(vec![
        ("(a + b) ** 2", sum.checked_pow(2)?),
        ("(a + b) ** 3", sum.checked_pow(3)?),
        ("a / a", a.checked_div(&a)?),
        ("2 / (a + b)", number(2).checked_div(&sum)?),
        ("-7 // 2", number(-7).checked_floor_div(2)?),
        ("double(a + b)", double.call([sum.clone()])?),
        ("address of (i, j) in (n, m)", shape.address([i, j])?),
    ])
}

/// Builds the demonstration expressions of the symbolic arrays.
fn array_demos() -> Result<Vec<(&'static str, Expr<Arrays>)>, Error> {
    let [n, n1, n2] = symbols(["n", "n1", "n2"]);
    let a = array("a");
    let b = shaped("b", ShapeBuilder::new([n1, n2]).build()?);

    let expr = a
        .checked_add(&a.scale(&n)?)?
        .checked_add(2)?
        .checked_add(&b)?;
    let row = expr.index([Index::from(1)])?;
    Ok(vec![("a + n * a + 2 + b", expr), ("(a + n * a + 2 + b)[1]", row)])
}

/// Renders every demonstration expression in the given target.
fn run(target: Target) -> Result<(), Error> {
    let options = FormatOptionsBuilder::new().target(target).build();

    for (label, expr) in integer_demos()? {
        println!("{}:\n{}\n", label, expr.fmt(options));
    }
    for (label, expr) in array_demos()? {
        println!("{}:\n{}", label, expr.fmt(options));
        match shape_of(&expr) {
            Some(_) => println!("{}\n", describe(&expr)),
            None => println!(),
        }
    }
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let mut args = std::env::args();
    args.next();

    let target = match args.next() {
        Some(name) => match name.parse::<Target>() {
            Ok(target) => target,
            Err(err) => {
                err.eprint("target");
                std::process::exit(1);
            },
        },
        None => Target::default(),
    };
    debug!(?target, "rendering demonstrations");

    if let Err(err) = run(target) {
        err.eprint("demo");
        std::process::exit(1);
    }
}
