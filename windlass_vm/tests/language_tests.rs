// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! End-to-end language tests: whole scripts evaluated through the engine,
//! with the job queue drained between turns.

use windlass_vm::ecmascript::execution::Options;
use windlass_vm::{DefaultHostHooks, Engine, JsValue};

struct Harness {
    engine: Engine,
    realm: windlass_vm::ecmascript::execution::RealmIdentifier,
}

impl Harness {
    fn new() -> Self {
        let mut engine = Engine::with_default_plugins(Options::default(), &DefaultHostHooks);
        let realm = engine.create_realm().expect("realm creation");
        Self { engine, realm }
    }

    /// Evaluates a script and renders its completion value.
    fn eval(&mut self, source: &str) -> Result<String, String> {
        let result = self.engine.run_script(source, self.realm, false);
        let drain = self.engine.run_jobs();
        match (result, drain) {
            (Ok(value), Ok(())) => Ok(self.engine.debug_string(value)),
            (Err(err), _) => Err(self.engine.debug_string(err.value())),
            (_, Err(err)) => Err(self.engine.debug_string(err.value())),
        }
    }

    fn eval_strict(&mut self, source: &str) -> Result<String, String> {
        let result = self.engine.run_script(source, self.realm, true);
        let drain = self.engine.run_jobs();
        match (result, drain) {
            (Ok(value), Ok(())) => Ok(self.engine.debug_string(value)),
            (Err(err), _) => Err(self.engine.debug_string(err.value())),
            (_, Err(err)) => Err(self.engine.debug_string(err.value())),
        }
    }
}

fn eval_one(source: &str) -> Result<String, String> {
    Harness::new().eval(source)
}

#[test]
fn arithmetic_and_string_concatenation() {
    assert_eq!(eval_one("1 + 2 * 3").unwrap(), "7");
    assert_eq!(eval_one("'a' + 1").unwrap(), "a1");
    assert_eq!(eval_one("2 ** 10").unwrap(), "1024");
    assert_eq!(eval_one("7 % 4").unwrap(), "3");
    assert_eq!(eval_one("1 / 0").unwrap(), "Infinity");
}

#[test]
fn equality_operators() {
    assert_eq!(eval_one("NaN === NaN").unwrap(), "false");
    assert_eq!(eval_one("0 === -0").unwrap(), "true");
    assert_eq!(eval_one("1 == '1'").unwrap(), "true");
    assert_eq!(eval_one("null == undefined").unwrap(), "true");
    assert_eq!(eval_one("null == 0").unwrap(), "false");
    assert_eq!(eval_one("Object.is(NaN, NaN)").unwrap(), "true");
    assert_eq!(eval_one("Object.is(0, -0)").unwrap(), "false");
}

#[test]
fn variables_functions_and_closures() {
    assert_eq!(
        eval_one("function add(a, b) { return a + b; } add(2, 3)").unwrap(),
        "5"
    );
    assert_eq!(
        eval_one(
            "function counter() { let n = 0; return function () { n += 1; return n; }; }
             var c = counter(); c(); c(); c()"
        )
        .unwrap(),
        "3"
    );
    assert_eq!(
        eval_one("var f = (x) => x * 2; f(21)").unwrap(),
        "42"
    );
    // Hoisted function declarations are callable before their position.
    assert_eq!(eval_one("before(); function before() { return 'ok'; }").unwrap(), "ok");
}

#[test]
fn default_parameters_and_rest() {
    assert_eq!(eval_one("function f(a, b = a + 1) { return b; } f(1)").unwrap(), "2");
    assert_eq!(
        eval_one("function f(...rest) { return rest.length; } f(1, 2, 3)").unwrap(),
        "3"
    );
    assert_eq!(
        eval_one("function f(a, b) { return arguments.length; } f(1, 2, 3)").unwrap(),
        "3"
    );
    // Mapped arguments stay linked to simple parameters.
    assert_eq!(
        eval_one("function f(a) { arguments[0] = 9; return a; } f(1)").unwrap(),
        "9"
    );
}

#[test]
fn destructuring_binding_and_assignment() {
    assert_eq!(eval_one("let [a, , b = 10] = [1, 2]; a + b").unwrap(), "11");
    assert_eq!(
        eval_one("let { x, y: renamed, ...rest } = { x: 1, y: 2, z: 3 }; x + renamed + rest.z")
            .unwrap(),
        "6"
    );
    assert_eq!(eval_one("var a, b; [a, b] = [b, a] = [1, 2]; '' + a + b").unwrap(), "12");
}

#[test]
fn control_flow_and_labels() {
    assert_eq!(
        eval_one(
            "let total = 0;
             outer: for (let i = 0; i < 5; i++) {
               for (let j = 0; j < 5; j++) {
                 if (j === 2) continue outer;
                 if (i === 3) break outer;
                 total += 1;
               }
             }
             total"
        )
        .unwrap(),
        "6"
    );
    assert_eq!(
        eval_one(
            "let s = '';
             switch (2) {
               case 1: s += 'one';
               case 2: s += 'two';
               case 3: s += 'three'; break;
               default: s += 'none';
             }
             s"
        )
        .unwrap(),
        "twothree"
    );
    // Per-iteration let bindings are captured separately.
    assert_eq!(
        eval_one(
            "var fns = [];
             for (let i = 0; i < 3; i++) { fns.push(() => i); }
             '' + fns[0]() + fns[1]() + fns[2]()"
        )
        .unwrap(),
        "012"
    );
}

#[test]
fn try_catch_finally_completion_algebra() {
    assert_eq!(
        eval_one("function f() { try { return 'try'; } finally { } } f()").unwrap(),
        "try"
    );
    // An abrupt finalizer wins over the pending completion.
    assert_eq!(
        eval_one("function f() { try { return 'try'; } finally { return 'finally'; } } f()")
            .unwrap(),
        "finally"
    );
    assert_eq!(
        eval_one("try { throw new Error('x'); } catch (e) { e.message }").unwrap(),
        "x"
    );
    assert_eq!(
        eval_one(
            "let log = '';
             try { try { throw 'inner'; } finally { log += 'f'; } }
             catch (e) { log += e; }
             log"
        )
        .unwrap(),
        "finner"
    );
}

#[test]
fn scenario_non_configurable_property() {
    // Non-strict: the failed delete is silent and the value survives.
    assert_eq!(
        eval_one(
            "let x = {a: 1};
             Object.defineProperty(x, 'a', {configurable: false});
             delete x.a;
             x.a"
        )
        .unwrap(),
        "1"
    );
    // Strict: the failed delete is a TypeError.
    let result = Harness::new().eval_strict(
        "let x = {a: 1};
         Object.defineProperty(x, 'a', {configurable: false});
         delete x.a;
         x.a",
    );
    let error = result.unwrap_err();
    assert!(error.starts_with("TypeError"), "{error}");
}

#[test]
fn descriptor_invariants() {
    assert_eq!(
        eval_one(
            "var o = {};
             Object.defineProperty(o, 'p', {value: 1, writable: false, configurable: false});
             var first;
             try { Object.defineProperty(o, 'p', {value: 2}); first = 'no-throw'; }
             catch (e) { first = e instanceof TypeError; }
             first"
        )
        .unwrap(),
        "true"
    );
    assert_eq!(
        eval_one(
            "var o = {};
             Object.preventExtensions(o);
             var out;
             try { Object.defineProperty(o, 'fresh', {value: 1}); out = 'no-throw'; }
             catch (e) { out = e instanceof TypeError; }
             out"
        )
        .unwrap(),
        "true"
    );
}

#[test]
fn scenario_promise_chain() {
    let mut harness = Harness::new();
    harness
        .eval(
            "var order = '';
             var out;
             var p = Promise.resolve(1).then(v => { order += 'a'; return v + 1; })
                                        .then(v => { order += 'b'; return v * 3; });
             p.then(v => { out = v; });
             order += 'sync';",
        )
        .unwrap();
    // Handlers never ran synchronously; the drain between turns ran them
    // in registration order.
    assert_eq!(harness.eval("order").unwrap(), "syncab");
    assert_eq!(harness.eval("out").unwrap(), "6");
}

#[test]
fn promise_rejection_and_executor() {
    let mut harness = Harness::new();
    harness
        .eval(
            "var result;
             new Promise((resolve, reject) => { reject(new Error('nope')); })
               .catch(e => { result = e.message; });",
        )
        .unwrap();
    assert_eq!(harness.eval("result").unwrap(), "nope");
    // A chaining cycle rejects with a TypeError.
    harness
        .eval(
            "var cycle;
             var resolveFn;
             var p = new Promise(r => { resolveFn = r; });
             resolveFn(p);
             p.catch(e => { cycle = e instanceof TypeError; });",
        )
        .unwrap();
    assert_eq!(harness.eval("cycle").unwrap(), "true");
}

#[test]
fn scenario_generator_protocol() {
    assert_eq!(
        eval_one(
            "function* g() { yield 1; yield 2; return 3; }
             var it = g();
             var a = it.next(), b = it.next(), c = it.next(), d = it.next();
             [a.value, a.done, b.value, b.done, c.value, c.done, d.value, d.done].join(',')"
        )
        .unwrap(),
        "1,false,2,false,3,true,,true"
    );
    // Resumption values flow back into the yield expression.
    assert_eq!(
        eval_one(
            "function* g() { const got = yield 'first'; yield got * 2; }
             var it = g();
             it.next();
             it.next(21).value"
        )
        .unwrap(),
        "42"
    );
    // A completed generator keeps reporting done results.
    assert_eq!(
        eval_one(
            "function* g() { yield 1; }
             var it = g();
             it.next(); it.next();
             var r = it.return(7);
             '' + r.value + r.done + it.next().done"
        )
        .unwrap(),
        "7truetrue"
    );
}

#[test]
fn generator_yield_delegation() {
    assert_eq!(
        eval_one(
            "function* inner() { yield 'a'; yield 'b'; return 'end'; }
             function* outer() { const got = yield* inner(); yield got; }
             var it = outer();
             [it.next().value, it.next().value, it.next().value].join('')"
        )
        .unwrap(),
        "abend"
    );
    // Return through the delegate runs the inner return path.
    assert_eq!(
        eval_one(
            "var closed = false;
             function makeIterable() {
               return {
                 [Symbol.iterator]() {
                   return {
                     next() { return { value: 1, done: false }; },
                     return(v) { closed = true; return { value: v, done: true }; },
                   };
                 },
               };
             }
             function* g() { yield* makeIterable(); }
             var it = g();
             it.next();
             it.return('bye');
             closed"
        )
        .unwrap(),
        "true"
    );
}

#[test]
fn scenario_class_hierarchy() {
    let error = eval_one(
        "class A { constructor() { this.x = 1; } }
         class B extends A { constructor() { /* no super */ } }
         new B();",
    )
    .unwrap_err();
    assert!(error.starts_with("ReferenceError"), "{error}");

    assert_eq!(
        eval_one(
            "class A { constructor() { this.x = 1; } speak() { return 'a' + this.x; } }
             class B extends A { constructor() { super(); this.x += 1; } speak() { return 'b' + super.speak(); } }
             new B().speak()"
        )
        .unwrap(),
        "ba2"
    );
    assert_eq!(
        eval_one(
            "class Point { x = 10; static origin = 'O'; getX() { return this.x; } }
             new Point().getX() + Point.origin"
        )
        .unwrap(),
        "10O"
    );
}

#[test]
fn scenario_string_exotic_indexing() {
    assert_eq!(eval_one("'abc'[1]").unwrap(), "b");
    assert_eq!(
        eval_one(
            "var d = Object.getOwnPropertyDescriptor(Object('abc'), '1');
             [d.value, d.writable, d.enumerable, d.configurable].join(',')"
        )
        .unwrap(),
        "b,false,true,false"
    );
    assert_eq!(eval_one("'abc'.length").unwrap(), "3");
}

#[test]
fn scenario_regexp_captures() {
    assert_eq!(
        eval_one("var r = /(a)(b)/.exec('zabq'); [r.index, r[0], r[1], r[2]].join(',')").unwrap(),
        "1,ab,a,b"
    );
    assert_eq!(eval_one("/\\d+/.test('abc123')").unwrap(), "true");
    assert_eq!(eval_one("/(a)(b)/.exec('nope')").unwrap(), "null");
}

#[test]
fn regexp_last_index_counts_utf16_units() {
    // "café" is 4 UTF-16 units but 5 UTF-8 bytes; lastIndex must use the
    // former, like the `index` result property.
    assert_eq!(
        eval_one("var r = /é/g; var m = r.exec('café'); [m.index, r.lastIndex].join(',')")
            .unwrap(),
        "3,4"
    );
    assert_eq!(
        eval_one("var r = /語/g; r.exec('日本語x'); r.lastIndex").unwrap(),
        "3"
    );
    // A UTF-16 lastIndex set by script positions the next sticky match.
    assert_eq!(
        eval_one("var r = /x/y; r.lastIndex = 3; r.exec('日本語x')[0]").unwrap(),
        "x"
    );
    // Consecutive global execs walk the subject.
    assert_eq!(
        eval_one(
            "var r = /a/g;
             var hits = [];
             var m;
             while ((m = r.exec('ábaca')) !== null) hits.push(m.index);
             hits.join(',')"
        )
        .unwrap(),
        "1,3"
    );
}

#[test]
fn string_match_goes_through_symbol_match() {
    // A global regexp collects every match.
    assert_eq!(eval_one("'aaa'.match(/a/g).join(',')").unwrap(), "a,a,a");
    assert_eq!(eval_one("'aaa'.match(/a/g).length").unwrap(), "3");
    // A non-global regexp returns the single exec result.
    assert_eq!(eval_one("var m = 'zabq'.match(/(a)(b)/); [m.index, m[0], m[1]].join(',')").unwrap(), "1,ab,a");
    assert_eq!(eval_one("'abc'.match(/x/g)").unwrap(), "null");
    // A user-defined @@match takes over entirely.
    assert_eq!(
        eval_one(
            "var custom = { [Symbol.match](s) { return 'saw:' + s; } };
             'input'.match(custom)"
        )
        .unwrap(),
        "saw:input"
    );
}

#[test]
fn string_split_goes_through_symbol_split() {
    assert_eq!(eval_one("'a1b2c'.split(/\\d/).join('-')").unwrap(), "a-b-c");
    // Capture groups splice into the output.
    assert_eq!(eval_one("'a1b'.split(/(\\d)/).join(',')").unwrap(), "a,1,b");
    assert_eq!(eval_one("'a,b,c'.split(/,/, 2).join('|')").unwrap(), "a|b");
    assert_eq!(
        eval_one(
            "var custom = { [Symbol.split](s, lim) { return [s, lim]; } };
             'text'.split(custom, 7).join(':')"
        )
        .unwrap(),
        "text:7"
    );
}

#[test]
fn string_replace_goes_through_symbol_replace() {
    assert_eq!(eval_one("'a1b2'.replace(/\\d/, '#')").unwrap(), "a#b2");
    assert_eq!(eval_one("'a1b2'.replace(/\\d/g, '#')").unwrap(), "a#b#");
    // $-patterns expand against the match and its captures.
    assert_eq!(eval_one("'zabq'.replace(/(a)(b)/, '[$2$1]')").unwrap(), "z[ba]q");
    assert_eq!(eval_one("'abc'.replace(/b/, '<$&>')").unwrap(), "a<b>c");
    // Functional replace values see match, position, and subject.
    assert_eq!(
        eval_one("'a1b2'.replace(/\\d/g, (m, i) => '[' + m + '@' + i + ']')").unwrap(),
        "a[1@1]b[2@3]"
    );
    assert_eq!(
        eval_one("'x-y-x'.replaceAll(/x/g, 'z')").unwrap(),
        "z-y-z"
    );
    // replaceAll rejects a non-global regexp search value.
    let error = eval_one("'aaa'.replaceAll(/a/, 'b')").unwrap_err();
    assert!(error.starts_with("TypeError"), "{error}");
}

#[test]
fn number_string_round_trip() {
    // to-string(to-number(s)) === s for canonically formatted strings.
    for s in ["0.1", "1.5", "123456.789", "1e+30"] {
        let script = format!("String(Number('{s}')) === '{s}'");
        assert_eq!(eval_one(&script).unwrap(), "true", "round-trip of {s}");
    }
    assert_eq!(eval_one("(255).toString(16)").unwrap(), "ff");
}

#[test]
fn boxing_round_trip() {
    assert_eq!(eval_one("Object(42).valueOf() === 42").unwrap(), "true");
    assert_eq!(eval_one("Object('s').valueOf() === 's'").unwrap(), "true");
    assert_eq!(eval_one("Object(true).valueOf() === true").unwrap(), "true");
}

#[test]
fn json_structure_round_trip() {
    assert_eq!(
        eval_one(
            "var source = '{\"a\":[1,2,{\"b\":null}],\"c\":\"text\"}';
             JSON.stringify(JSON.parse(source)) === source"
        )
        .unwrap(),
        "true"
    );
}

#[test]
fn iterators_and_spread() {
    assert_eq!(eval_one("[...'abc'].join('-')").unwrap(), "a-b-c");
    assert_eq!(
        eval_one("var out = []; for (const v of [10, 20]) out.push(v); out.join(',')").unwrap(),
        "10,20"
    );
    assert_eq!(
        eval_one(
            "var obj = { a: 1, b: 2 };
             var keys = [];
             for (var k in obj) keys.push(k);
             keys.join(',')"
        )
        .unwrap(),
        "a,b"
    );
    assert_eq!(eval_one("Math.max(...[1, 5, 3])").unwrap(), "5");
}

#[test]
fn map_set_collections() {
    assert_eq!(
        eval_one(
            "var m = new Map([[1, 'one'], [2, 'two']]);
             m.set(3, 'three');
             '' + m.size + m.get(2) + m.has(4)"
        )
        .unwrap(),
        "3twofalse"
    );
    assert_eq!(
        eval_one("var s = new Set([1, 2, 2, 3]); '' + s.size + s.has(2)").unwrap(),
        "3true"
    );
}

#[test]
fn async_functions_resolve_through_jobs() {
    let mut harness = Harness::new();
    harness
        .eval(
            "var out;
             async function work() {
               const a = await 1;
               const b = await (a + 1);
               return b * 3;
             }
             work().then(v => { out = v; });",
        )
        .unwrap();
    assert_eq!(harness.eval("out").unwrap(), "6");

    harness
        .eval(
            "var caught;
             async function boom() { throw new Error('async-fail'); }
             boom().catch(e => { caught = e.message; });",
        )
        .unwrap();
    assert_eq!(harness.eval("caught").unwrap(), "async-fail");
}

#[test]
fn proxy_traps_and_invariants() {
    assert_eq!(
        eval_one(
            "var log = [];
             var p = new Proxy({x: 1}, {
               get(target, key, receiver) { log.push('get:' + String(key)); return target[key]; },
             });
             p.x; p.x;
             log.join(',')"
        )
        .unwrap(),
        "get:x,get:x"
    );
    // A get trap may not lie about a frozen data property.
    assert_eq!(
        eval_one(
            "var target = {};
             Object.defineProperty(target, 'fixed', {value: 1, writable: false, configurable: false});
             var p = new Proxy(target, { get() { return 2; } });
             var out;
             try { p.fixed; out = 'no-throw'; } catch (e) { out = e instanceof TypeError; }
             out"
        )
        .unwrap(),
        "true"
    );
    assert_eq!(
        eval_one(
            "var pair = Proxy.revocable({}, {});
             pair.revoke();
             var out;
             try { pair.proxy.x; out = 'no-throw'; } catch (e) { out = e instanceof TypeError; }
             out"
        )
        .unwrap(),
        "true"
    );
}

#[test]
fn typeof_and_unresolvable_references() {
    assert_eq!(eval_one("typeof missing").unwrap(), "undefined");
    assert_eq!(eval_one("typeof (() => 0)").unwrap(), "function");
    assert_eq!(eval_one("typeof 1n").unwrap(), "bigint");
    let error = eval_one("missing").unwrap_err();
    assert!(error.starts_with("ReferenceError"), "{error}");
}

#[test]
fn temporal_dead_zone() {
    let error = eval_one("{ before; let before = 1; }").unwrap_err();
    assert!(error.starts_with("ReferenceError"), "{error}");
    let error = eval_one("const c = 1; c = 2;").unwrap_err();
    assert!(error.starts_with("TypeError"), "{error}");
}

#[test]
fn bigint_arithmetic() {
    assert_eq!(eval_one("(2n ** 64n).toString()").unwrap(), "18446744073709551616");
    let error = eval_one("1n + 1").unwrap_err();
    assert!(error.starts_with("TypeError"), "{error}");
}

#[test]
fn error_objects_carry_name_message_and_stack() {
    assert_eq!(
        eval_one("var e = new RangeError('out of range'); e.name + ': ' + e.message").unwrap(),
        "RangeError: out of range"
    );
    assert_eq!(
        eval_one("typeof new Error('x').stack").unwrap(),
        "string"
    );
    assert_eq!(
        eval_one("new SyntaxError('y') instanceof Error").unwrap(),
        "true"
    );
}

#[test]
fn step_budget_bounds_runaway_scripts() {
    let mut engine = Engine::with_default_plugins(
        Options {
            step_budget: Some(10_000),
            ..Default::default()
        },
        &DefaultHostHooks,
    );
    let realm = engine.create_realm().unwrap();
    let result = engine.run_script("while (true) {}", realm, false);
    let err = result.unwrap_err();
    let rendered = engine.debug_string(err.value());
    assert!(rendered.starts_with("RangeError"), "{rendered}");
}

#[test]
fn getters_setters_and_accessors() {
    assert_eq!(
        eval_one(
            "var store = 0;
             var o = {
               get double() { return store * 2; },
               set double(v) { store = v; },
             };
             o.double = 21;
             o.double"
        )
        .unwrap(),
        "42"
    );
}

#[test]
fn with_statement_scoping() {
    assert_eq!(
        eval_one("var o = { x: 5 }; var out; with (o) { out = x; } out").unwrap(),
        "5"
    );
}
